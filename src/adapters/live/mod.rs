//! Live adapters for real service interactions.

pub mod account;
pub mod config;
pub mod http;
pub mod profile_store;

pub use account::HttpAccountClient;
pub use config::FileConfig;
pub use http::LiveTransport;
pub use profile_store::DiskProfileStore;
