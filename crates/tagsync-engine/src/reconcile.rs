//! The reconciliation driver: pairs input records with remote records and
//! applies the tag merger over the whole collections.
//!
//! The driver owns the remote collection for the duration of the run. It
//! is a single sequential pass over the input records, each scanning the
//! remote records, followed by one orphan-tagging pass. New synthetic
//! records are collected on the side and appended after the input pass,
//! so the remote collection is never grown while it is being scanned.

use tracing::debug;

use tagsync_model::Element;

use crate::merge::{merge_tags, new_record_tags};
use crate::policy::MergePolicy;
use crate::report::{AuditReport, InputSection, NewRecord, OrphanSection, RemoteMerge};
use crate::vocabulary::{GovernedVocabulary, RefKey};

/// Synthetic identifiers are assigned strictly below this threshold.
pub const SYNTHETIC_ID_START: i64 = -1000;

/// Sentinel tag applied to orphaned remote records.
pub const NOT_FOUND_KEY: &str = "NOT_FOUND";

/// Value of the sentinel tag.
pub const NOT_FOUND_VALUE: &str = "yes";

/// Counters accumulated over one reconciliation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Matched remote records whose tag set changed.
    pub updated: usize,
    /// Synthetic records appended for unmatched input records.
    pub added: usize,
    /// Remote records carrying the identifying key that no input record
    /// matched.
    pub orphaned: usize,
}

/// Reconcile the input dataset against the remote dataset.
///
/// Remote records matched by an input record get the merged tag set
/// assigned back, plus the `matched` flag and, when the merge changed
/// anything, the `modified` flag. Unmatched input records are appended to
/// `remote` as synthetic nodes with strictly decreasing negative
/// identifiers. Remote records carrying the identifying key that end the
/// run unmatched and unmodified are tagged with the not-found marker.
///
/// Identifying keys use single-match semantics unless the policy declares
/// them multi-match: the first remote record sharing the value wins and
/// the scan stops, while multi-match merges every sharing record.
pub fn reconcile(
    remote: &mut Vec<Element>,
    input: &[Element],
    ref_key: &RefKey,
    vocabulary: &GovernedVocabulary,
    policy: &MergePolicy,
) -> AuditReport {
    let mut stats = ReconcileStats::default();
    let mut sections = Vec::with_capacity(input.len());
    let mut appended = Vec::new();
    let mut next_id = SYNTHETIC_ID_START;
    let multi_match = policy.multi_match(&ref_key.key);

    for input_record in input {
        let ref_value = input_record.tag(&ref_key.key).map(str::to_string);
        let mut merges = Vec::new();

        if let Some(value) = ref_value.as_deref() {
            for remote_record in remote.iter_mut() {
                if remote_record.tag(&ref_key.key) != Some(value) {
                    continue;
                }

                let merge = merge_tags(
                    &remote_record.tags,
                    &input_record.tags,
                    vocabulary,
                    &ref_key.key,
                    policy,
                );
                debug!(
                    ref_value = value,
                    remote_id = remote_record.id,
                    modified = merge.modified,
                    "matched remote record"
                );

                remote_record.matched = true;
                if merge.modified && !remote_record.modified {
                    remote_record.modified = true;
                    stats.updated += 1;
                }
                remote_record.tags = merge.tags;
                merges.push(RemoteMerge {
                    remote_id: remote_record.id,
                    kind: remote_record.kind,
                    decisions: merge.decisions,
                });

                if !multi_match {
                    break;
                }
            }
        }

        let added = if merges.is_empty() {
            next_id -= 1;
            let mut record = input_record.clone();
            record.id = next_id;
            record.tags = new_record_tags(&input_record.tags);
            record.modified = true;
            debug!(id = record.id, "appending new record");

            stats.added += 1;
            let new_record = NewRecord {
                id: record.id,
                tags: record.tags.clone(),
            };
            appended.push(record);
            Some(new_record)
        } else {
            None
        };

        sections.push(InputSection {
            ref_value,
            merges,
            added,
        });
    }

    remote.append(&mut appended);

    let mut orphans = Vec::new();
    for remote_record in remote.iter_mut() {
        if remote_record.tags.contains_key(&ref_key.key)
            && !remote_record.matched
            && !remote_record.modified
        {
            remote_record
                .tags
                .insert(NOT_FOUND_KEY.to_string(), NOT_FOUND_VALUE.to_string());
            stats.orphaned += 1;
            orphans.push(OrphanSection {
                remote_id: remote_record.id,
                kind: remote_record.kind,
                tags: remote_record.tags.clone(),
            });
        }
    }

    AuditReport {
        ref_key: ref_key.key.clone(),
        sections,
        orphans,
        stats,
    }
}
