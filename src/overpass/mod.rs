//! Overpass API query construction and transport.

mod client;
mod query;

pub use client::{decode_body, OverpassClient, QueryTransport, TransportError};
pub use query::{build_query, TIMEOUT_SECS};
