//! Replays recorded HTTP interactions during playback.

use crate::error::FixtureError;
use crate::fixture::format::{Fixture, HttpInteraction};
use crate::ports::http::HttpResponse;

/// How playback pairs live requests with recorded interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOrder {
    /// Requests must arrive in exactly the recorded order.
    #[default]
    Strict,
    /// Each request consumes the first unconsumed interaction with the
    /// same method and path, wherever it sits.
    Relaxed,
}

/// How playback compares request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMatching {
    /// Bodies are ignored; method and path decide the match.
    #[default]
    Relaxed,
    /// When the recording kept a request body, the live body must equal
    /// it byte for byte.
    Strict,
}

/// Serves recorded responses for one test and tracks consumption.
///
/// The first mismatch latches: the failing request gets an error the CLI
/// reports like any service failure, and [`InteractionPlayer::finish`]
/// re-raises it so the harness fails the test even if the command under
/// test swallowed the exit status.
#[derive(Debug)]
pub struct InteractionPlayer {
    name: String,
    interactions: Vec<HttpInteraction>,
    used: Vec<bool>,
    order: MatchOrder,
    body_matching: BodyMatching,
    failed: bool,
    failure: Option<FixtureError>,
}

impl InteractionPlayer {
    /// Creates a player over the fixture's interactions.
    #[must_use]
    pub fn new(fixture: &Fixture, order: MatchOrder, body_matching: BodyMatching) -> Self {
        Self {
            name: fixture.name.clone(),
            used: vec![false; fixture.interactions.len()],
            interactions: fixture.interactions.clone(),
            order,
            body_matching,
            failed: false,
            failure: None,
        }
    }

    /// Fixture name this player serves.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interactions not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }

    /// Whether a mismatch already latched.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Serves the response for one request, consuming the matched
    /// recording.
    ///
    /// # Errors
    ///
    /// Returns an error when no recording matches under the configured
    /// order and body rules, or when the fixture is exhausted. Any such
    /// error also latches, so `finish` reports it.
    pub fn play(
        &mut self,
        method: &str,
        path: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, FixtureError> {
        let index = match self.find_match(method, path) {
            Ok(index) => index,
            Err(err) => return Err(self.latch(err)),
        };
        let interaction = &self.interactions[index];
        if self.body_matching == BodyMatching::Strict {
            if let Some(recorded) = &interaction.request_body {
                if body != Some(recorded.as_str()) {
                    let err = FixtureError::BodyMismatch {
                        method: method.to_string(),
                        path: path.to_string(),
                        seq: interaction.seq,
                    };
                    return Err(self.latch(err));
                }
            }
        }
        self.used[index] = true;
        let interaction = &self.interactions[index];
        Ok(HttpResponse {
            status: interaction.status,
            headers: interaction.response_headers.clone(),
            body: interaction.response_body.clone(),
        })
    }

    /// Closes the player: re-raises a latched mismatch, then fails if any
    /// recording was never consumed.
    ///
    /// # Errors
    ///
    /// Returns the latched mismatch if one occurred, otherwise a leftover
    /// error when unconsumed interactions remain.
    pub fn finish(mut self) -> Result<(), FixtureError> {
        if let Some(failure) = self.failure.take() {
            return Err(failure);
        }
        let remaining = self.remaining();
        if remaining > 0 {
            if let Some(first) = self.first_unused() {
                return Err(FixtureError::LeftoverInteractions {
                    remaining,
                    method: first.method.clone(),
                    path: first.path.clone(),
                });
            }
        }
        Ok(())
    }

    fn find_match(&self, method: &str, path: &str) -> Result<usize, FixtureError> {
        let Some(next) = self.used.iter().position(|used| !used) else {
            return Err(FixtureError::RecordingExhausted {
                method: method.to_string(),
                path: path.to_string(),
                recorded: self.interactions.len(),
            });
        };
        match self.order {
            MatchOrder::Strict => {
                let candidate = &self.interactions[next];
                if candidate.method == method && candidate.path == path {
                    Ok(next)
                } else {
                    Err(FixtureError::UnmatchedInteraction {
                        method: method.to_string(),
                        path: path.to_string(),
                        expected_method: candidate.method.clone(),
                        expected_path: candidate.path.clone(),
                        expected_seq: candidate.seq,
                    })
                }
            }
            MatchOrder::Relaxed => self
                .interactions
                .iter()
                .enumerate()
                .find(|(index, interaction)| {
                    !self.used[*index] && interaction.method == method && interaction.path == path
                })
                .map(|(index, _)| index)
                .ok_or_else(|| FixtureError::NoMatchingInteraction {
                    method: method.to_string(),
                    path: path.to_string(),
                    remaining: self.remaining(),
                }),
        }
    }

    fn first_unused(&self) -> Option<&HttpInteraction> {
        self.used
            .iter()
            .position(|used| !used)
            .map(|index| &self.interactions[index])
    }

    /// Stores a copy of the failure for `finish` and hands it back.
    fn latch(&mut self, err: FixtureError) -> FixtureError {
        self.failed = true;
        if self.failure.is_none() {
            self.failure = Some(duplicate(&err));
        }
        err
    }
}

/// Match failures carry only plain data, so they can be reconstructed for
/// the latch without requiring `Clone` on the whole error type.
fn duplicate(err: &FixtureError) -> FixtureError {
    match err {
        FixtureError::UnmatchedInteraction {
            method,
            path,
            expected_method,
            expected_path,
            expected_seq,
        } => FixtureError::UnmatchedInteraction {
            method: method.clone(),
            path: path.clone(),
            expected_method: expected_method.clone(),
            expected_path: expected_path.clone(),
            expected_seq: *expected_seq,
        },
        FixtureError::NoMatchingInteraction {
            method,
            path,
            remaining,
        } => FixtureError::NoMatchingInteraction {
            method: method.clone(),
            path: path.clone(),
            remaining: *remaining,
        },
        FixtureError::RecordingExhausted {
            method,
            path,
            recorded,
        } => FixtureError::RecordingExhausted {
            method: method.clone(),
            path: path.clone(),
            recorded: *recorded,
        },
        FixtureError::BodyMismatch { method, path, seq } => FixtureError::BodyMismatch {
            method: method.clone(),
            path: path.clone(),
            seq: *seq,
        },
        other => FixtureError::NoMatchingInteraction {
            method: "?".to_string(),
            path: other.to_string(),
            remaining: 0,
        },
    }
}
