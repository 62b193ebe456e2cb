//! Identifying-key discovery and the governed vocabulary.
//!
//! The identifying key is the single `ref:`-prefixed key used to join input
//! records to remote records. The governed vocabulary is the set of
//! ownership prefixes the input dataset claims authority over: a remote tag
//! whose prefix is in the vocabulary is deleted when the matched input
//! record does not carry it.

use std::collections::BTreeSet;

use tagsync_model::Element;

use crate::error::{EngineError, EngineResult};
use crate::keys::{is_administrative, ownership_prefix};

/// Namespace prefix marking a key as a candidate identifying key.
pub const REF_PREFIX: &str = "ref:";

/// The identifying key discovered from an input dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefKey {
    /// The full key, e.g. `ref:xx`.
    pub key: String,
    /// Number of input records carrying the key.
    pub count: usize,
}

/// Scan the input dataset for its identifying key.
///
/// Exactly one distinct `ref:`-prefixed key may appear across the whole
/// dataset. Two distinct keys or none at all are configuration errors and
/// abort the run before any remote fetch.
pub fn discover_ref_key(records: &[Element]) -> EngineResult<RefKey> {
    let mut found: Option<RefKey> = None;

    for record in records {
        for key in record.tags.keys() {
            if !key.starts_with(REF_PREFIX) {
                continue;
            }
            match found.as_mut() {
                Some(ref_key) if ref_key.key == *key => ref_key.count += 1,
                Some(ref_key) => {
                    return Err(EngineError::ConflictingRefKeys {
                        first: ref_key.key.clone(),
                        second: key.clone(),
                    })
                }
                None => {
                    found = Some(RefKey {
                        key: key.clone(),
                        count: 1,
                    })
                }
            }
        }
    }

    found.ok_or(EngineError::MissingRefKey)
}

/// The set of ownership prefixes governed by an input dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GovernedVocabulary {
    prefixes: BTreeSet<String>,
}

impl GovernedVocabulary {
    /// Returns `true` if the key's ownership prefix is governed.
    pub fn governs(&self, key: &str) -> bool {
        self.prefixes.contains(ownership_prefix(key))
    }

    /// Returns `true` if the exact prefix is in the vocabulary.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Number of governed prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns `true` if no prefix is governed.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterate the governed prefixes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

/// Build the governed vocabulary from the input dataset.
///
/// Every non-administrative key in every record contributes its ownership
/// prefix, except keys sharing the identifying key's own prefix. The
/// identifying key joins records; it does not claim tag ownership.
pub fn build_vocabulary(records: &[Element], ref_key: &str) -> GovernedVocabulary {
    let ref_prefix = ownership_prefix(ref_key);
    let mut prefixes = BTreeSet::new();

    for record in records {
        for key in record.tags.keys() {
            if is_administrative(key) {
                continue;
            }
            let prefix = ownership_prefix(key);
            if prefix == ref_prefix {
                continue;
            }
            prefixes.insert(prefix.to_string());
        }
    }

    GovernedVocabulary { prefixes }
}
