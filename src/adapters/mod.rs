//! Port implementations for every run mode.
//!
//! `live` adapters talk to the real world. `recording` wraps the live
//! transport and captures traffic into fixtures. `playback` serves
//! recorded traffic without a network. `canned` supplies fixed account,
//! profile and config state for mocked runs.

pub mod canned;
pub mod live;
pub mod playback;
pub mod recording;
