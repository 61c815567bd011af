//! Playback transport serving responses from the current test's fixture.

use std::sync::Mutex;

use crate::error::{FixtureError, TransportError};
use crate::fixture::player::InteractionPlayer;
use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport};

/// Serves every request from an installed [`InteractionPlayer`]. A
/// request arriving with no player installed is an error: playback must
/// never fall through to the network.
#[derive(Default)]
pub struct PlaybackTransport {
    player: Mutex<Option<InteractionPlayer>>,
}

impl PlaybackTransport {
    /// Creates a transport with no fixture installed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the player for the test about to run, replacing any
    /// previous one.
    pub fn install(&self, player: InteractionPlayer) {
        let mut guard = self.player.lock().expect("player lock poisoned");
        *guard = Some(player);
    }

    /// Removes and returns the current player so teardown can close it.
    pub fn take_player(&self) -> Option<InteractionPlayer> {
        let mut guard = self.player.lock().expect("player lock poisoned");
        guard.take()
    }
}

impl HttpTransport for PlaybackTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut guard = self.player.lock().expect("player lock poisoned");
        let player = guard.as_mut().ok_or(FixtureError::NoPlayerInstalled)?;
        let response = player.play(
            &request.method,
            &request.path_and_query(),
            request.body.as_deref(),
        )?;
        Ok(response)
    }
}
