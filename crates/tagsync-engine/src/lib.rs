//! Tag reconciliation engine.
//!
//! Compares a curated input dataset of point features against the matching
//! remote dataset and computes, per matched pair, which tags to keep,
//! replace, delete, or add under the equal-prefix ownership rule. Records
//! are joined on a single identifying key discovered from the input
//! dataset; unmatched input records become new synthetic records, and
//! remote records no input record accounts for are tagged as not found.
//!
//! # Key Types
//!
//! - [`RefKey`] / [`GovernedVocabulary`] — Identifying key and the prefix set the input dataset governs
//! - [`MergePolicy`] — Configurable exception rules and match multiplicity
//! - [`TagMerge`] / [`TagDecision`] — Result of merging one matched pair
//! - [`AuditReport`] / [`ReconcileStats`] — Decision trail and counters of a full run
//! - [`EngineError`] — Fatal configuration errors

pub mod error;
pub mod keys;
pub mod merge;
pub mod policy;
pub mod reconcile;
pub mod report;
pub mod rules;
pub mod vocabulary;

pub use error::{EngineError, EngineResult};
pub use keys::{is_administrative, ownership_prefix};
pub use merge::{merge_tags, new_record_tags, TagDecision, TagMerge};
pub use policy::{BrandRetention, MergePolicy};
pub use reconcile::{
    reconcile, ReconcileStats, NOT_FOUND_KEY, NOT_FOUND_VALUE, SYNTHETIC_ID_START,
};
pub use report::{AuditReport, InputSection, NewRecord, OrphanSection, RemoteMerge};
pub use rules::{retain_on_delete, retain_on_replace, RetainReason};
pub use vocabulary::{build_vocabulary, discover_ref_key, GovernedVocabulary, RefKey};
