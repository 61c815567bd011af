//! Recording adapters that capture traffic into fixtures.

pub mod http;

pub use http::RecordingTransport;
