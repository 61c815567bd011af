//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (network, account service, profile persistence, CLI
//! configuration). Implementations live in `src/adapters/`: live ones for
//! real runs, recording/playback and canned ones for mocked runs.

pub mod account;
pub mod config;
pub mod http;
pub mod profile_store;

pub use account::{AccountClient, AccountError, SubscriptionRecord};
pub use config::{ApiMode, CliConfig, ConfigError, ConfigSource};
pub use http::{HttpRequest, HttpResponse, HttpTransport};
pub use profile_store::{ProfileStore, ProfileStoreError};
