//! Data model for tagsync.
//!
//! This crate provides the element and tag types shared by every other
//! tagsync crate: the input dataset parser, the Overpass client, the
//! reconciliation engine, and the output writer all exchange [`Element`]
//! values.
//!
//! # Key Types
//!
//! - [`Element`] — a node, way, or relation with its tag map and optional
//!   provenance metadata
//! - [`ElementKind`] — the node/way/relation discriminator
//! - [`ElementMeta`] — version/timestamp/changeset/editor provenance,
//!   present only for elements that already exist upstream
//! - [`Member`] — a relation member reference

pub mod element;

pub use element::{Element, ElementKind, ElementMeta, Member};
