//! aqmaps client - web server API client
//!
//! Fetches the reference data a flight is checked against: what3words-style
//! location lookups, no-fly-zone polygons and the daily air-quality map.

pub mod client;
pub mod error;
pub mod payloads;

pub use client::WebServerClient;
pub use error::ClientError;
