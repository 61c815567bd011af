//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{DiskProfileStore, FileConfig, HttpAccountClient, LiveTransport};
use crate::error::TransportError;
use crate::ports::account::AccountClient;
use crate::ports::config::ConfigSource;
use crate::ports::http::HttpTransport;
use crate::ports::profile_store::ProfileStore;

/// Bundles all port trait objects into a single context.
///
/// Every command receives one of these instead of reaching for globals,
/// which is what lets the harness swap in recording, playback or canned
/// adapters without patching anything.
pub struct ServiceContext {
    /// HTTP transport service traffic goes through.
    pub transport: Arc<dyn HttpTransport>,
    /// Account service for login and subscription listing.
    pub account: Arc<dyn AccountClient>,
    /// Profile persistence.
    pub profile_store: Arc<dyn ProfileStore>,
    /// CLI configuration source.
    pub config: Arc<dyn ConfigSource>,
}

impl ServiceContext {
    /// Creates a live context: real network, disk-backed profile and
    /// config under the given home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn live(home: &Path) -> Result<Self, TransportError> {
        let transport: Arc<dyn HttpTransport> = Arc::new(LiveTransport::new()?);
        Ok(Self {
            account: Arc::new(HttpAccountClient::new(Arc::clone(&transport))),
            profile_store: Arc::new(DiskProfileStore::new(home)),
            config: Arc::new(FileConfig::new(home)),
            transport,
        })
    }
}
