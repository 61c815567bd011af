//! Recording transport: forwards to the live network and captures
//! request/response pairs while a test recorder is installed.

use std::sync::Mutex;

use crate::adapters::live::http::LiveTransport;
use crate::error::TransportError;
use crate::fixture::recorder::InteractionRecorder;
use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport};

/// Wraps the live transport and records interactions while a test body
/// runs. Outside a test window (suite setup, login, cleanup after
/// teardown) traffic passes through uncaptured, which keeps credential
/// exchanges out of fixtures.
pub struct RecordingTransport {
    inner: LiveTransport,
    recorder: Mutex<Option<InteractionRecorder>>,
}

impl RecordingTransport {
    /// Creates a recording wrapper around the given live transport.
    #[must_use]
    pub fn new(inner: LiveTransport) -> Self {
        Self {
            inner,
            recorder: Mutex::new(None),
        }
    }

    /// Opens a recording window: subsequent traffic lands in `recorder`.
    pub fn begin_test(&self, recorder: InteractionRecorder) {
        let mut guard = self.recorder.lock().expect("recorder lock poisoned");
        *guard = Some(recorder);
    }

    /// Closes the recording window and hands back the recorder, if one
    /// was installed.
    pub fn take_recorder(&self) -> Option<InteractionRecorder> {
        let mut guard = self.recorder.lock().expect("recorder lock poisoned");
        guard.take()
    }
}

impl HttpTransport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.inner.send(request)?;
        let mut guard = self.recorder.lock().expect("recorder lock poisoned");
        if let Some(recorder) = guard.as_mut() {
            recorder.record(
                &request.method,
                &request.path_and_query(),
                request.body.clone(),
                &response,
            );
        }
        Ok(response)
    }
}
