//! Canned adapters supplying fixed session state for mocked runs.

pub mod account;
pub mod config;
pub mod profile;

pub use account::{CannedAccountClient, CANNED_ACCESS_TOKEN};
pub use config::FixedConfig;
pub use profile::{canned_profile, MemoryProfileStore};
