//! The tag merger: computes the merged tag set for a matched pair.
//!
//! Merging never mutates the remote record's tag set in place. It builds a
//! new set from a copy, so the caller can still compare against the
//! pre-merge state, then assigns the result back onto the record.

use std::collections::BTreeMap;

use crate::keys::is_administrative;
use crate::policy::MergePolicy;
use crate::rules::{retain_on_delete, retain_on_replace, RetainReason};
use crate::vocabulary::GovernedVocabulary;

/// A single per-tag decision made while merging a matched pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagDecision {
    /// The remote value survives unchanged. `reason` is set when an
    /// exception rule overrode a replace or delete decision.
    Kept {
        key: String,
        value: String,
        reason: Option<RetainReason>,
    },
    /// The remote value was replaced by the input value.
    Replaced { key: String, old: String, new: String },
    /// The remote tag was deleted: its prefix is governed and the input
    /// record does not carry the key.
    Deleted { key: String, old: String },
    /// An input tag missing from the remote record was added.
    Added { key: String, value: String },
}

impl TagDecision {
    /// The tag key this decision is about.
    pub fn key(&self) -> &str {
        match self {
            TagDecision::Kept { key, .. }
            | TagDecision::Replaced { key, .. }
            | TagDecision::Deleted { key, .. }
            | TagDecision::Added { key, .. } => key,
        }
    }

    /// Returns `true` if the decision changed the tag set.
    pub fn is_change(&self) -> bool {
        !matches!(self, TagDecision::Kept { .. })
    }
}

/// The outcome of merging one remote record against one input record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagMerge {
    /// The merged tag set, to be assigned back onto the remote record.
    pub tags: BTreeMap<String, String>,
    /// `true` if any decision changed the tag set.
    pub modified: bool,
    /// Ordered per-tag decisions, for the audit log.
    pub decisions: Vec<TagDecision>,
}

impl TagMerge {
    /// Number of replaced tags.
    pub fn replacements(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, TagDecision::Replaced { .. }))
            .count()
    }

    /// Number of deleted tags.
    pub fn deletions(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, TagDecision::Deleted { .. }))
            .count()
    }

    /// Number of added tags.
    pub fn additions(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, TagDecision::Added { .. }))
            .count()
    }
}

/// Merge a matched input record's tags into a remote record's tags.
///
/// Per remote tag: a key present on both sides is kept when values agree
/// and replaced otherwise, unless an exception rule retains it. A key
/// absent from the input is deleted when its ownership prefix is governed
/// (again unless retained) and kept untouched when it is not. Input tags
/// missing from the result are then added. Administrative keys are outside
/// the merger's authority in both directions: remote ones are kept as-is,
/// input ones are never copied in.
pub fn merge_tags(
    remote_tags: &BTreeMap<String, String>,
    input_tags: &BTreeMap<String, String>,
    vocabulary: &GovernedVocabulary,
    ref_key: &str,
    policy: &MergePolicy,
) -> TagMerge {
    let mut tags = remote_tags.clone();
    let mut decisions = Vec::new();
    let mut modified = false;

    for (key, value) in remote_tags {
        if is_administrative(key) {
            decisions.push(TagDecision::Kept {
                key: key.clone(),
                value: value.clone(),
                reason: None,
            });
            continue;
        }

        if let Some(input_value) = input_tags.get(key) {
            if value == input_value {
                decisions.push(TagDecision::Kept {
                    key: key.clone(),
                    value: value.clone(),
                    reason: None,
                });
            } else if let Some(reason) =
                retain_on_replace(policy, ref_key, key, value, input_value)
            {
                decisions.push(TagDecision::Kept {
                    key: key.clone(),
                    value: value.clone(),
                    reason: Some(reason),
                });
            } else {
                tags.insert(key.clone(), input_value.clone());
                decisions.push(TagDecision::Replaced {
                    key: key.clone(),
                    old: value.clone(),
                    new: input_value.clone(),
                });
                modified = true;
            }
        } else if vocabulary.governs(key) {
            if let Some(reason) = retain_on_delete(policy, input_tags, key) {
                decisions.push(TagDecision::Kept {
                    key: key.clone(),
                    value: value.clone(),
                    reason: Some(reason),
                });
            } else {
                tags.remove(key);
                decisions.push(TagDecision::Deleted {
                    key: key.clone(),
                    old: value.clone(),
                });
                modified = true;
            }
        } else {
            decisions.push(TagDecision::Kept {
                key: key.clone(),
                value: value.clone(),
                reason: None,
            });
        }
    }

    for (key, value) in input_tags {
        if !tags.contains_key(key) && !is_administrative(key) {
            tags.insert(key.clone(), value.clone());
            decisions.push(TagDecision::Added {
                key: key.clone(),
                value: value.clone(),
            });
            modified = true;
        }
    }

    TagMerge {
        tags,
        modified,
        decisions,
    }
}

/// The full tag set of a newly introduced record: every non-administrative
/// input tag, verbatim.
pub fn new_record_tags(input_tags: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    input_tags
        .iter()
        .filter(|(key, _)| !is_administrative(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
