//! OSM XML I/O for tagsync.
//!
//! Reads curated .osm input files into records and writes reconciled
//! record collections back out as OSM XML.
//!
//! # Key Types
//!
//! - [`parse_nodes`] / [`read_nodes_file`] — Input-file parsing (nodes only)
//! - [`write_osm`] / [`write_osm_file`] — Output serialization with provenance and modify markers
//! - [`OsmError`] — I/O and document errors

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{OsmError, OsmResult};
pub use reader::{parse_nodes, read_nodes_file};
pub use writer::{write_osm, write_osm_file};
