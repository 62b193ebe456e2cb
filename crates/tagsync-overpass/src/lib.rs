//! Overpass API access for tagsync.
//!
//! Builds the area query for an identifying key and fetches the matching
//! remote dataset as a record collection.
//!
//! # Key Types
//!
//! - [`OverpassClient`] — Blocking client with timeout and user agent
//! - [`build_query`] — Overpass QL construction for one identifying key
//! - [`OverpassError`] — Fetch failures

pub mod client;
pub mod error;
pub mod query;

pub use client::{OverpassClient, DEFAULT_ENDPOINT};
pub use error::{OverpassError, OverpassResult};
pub use query::build_query;
