//! Fixture format, recording, playback and on-disk storage.

pub mod format;
pub mod player;
pub mod recorder;
pub mod store;

pub use format::{Fixture, HttpInteraction};
pub use player::{BodyMatching, InteractionPlayer, MatchOrder};
pub use recorder::InteractionRecorder;
pub use store::{sanitize_title, FixtureStore};
