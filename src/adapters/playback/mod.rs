//! Playback adapters serving recorded traffic without a network.

pub mod http;

pub use http::PlaybackTransport;
