//! Audit reporting: the per-record decision trail of a reconciliation run.
//!
//! The driver records one section per input record and one per orphaned
//! remote record; `render` turns the whole report into the text written
//! next to the output file. Uneventful keeps (equal values, ungoverned
//! keys) are part of the decision data but are not rendered, so the log
//! only shows what changed or what an exception rule protected.

use std::collections::BTreeMap;

use tagsync_model::ElementKind;

use crate::merge::TagDecision;
use crate::reconcile::ReconcileStats;

/// Decisions from merging one remote record against an input record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteMerge {
    pub remote_id: i64,
    pub kind: ElementKind,
    pub decisions: Vec<TagDecision>,
}

/// The synthetic record appended for an unmatched input record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub id: i64,
    pub tags: BTreeMap<String, String>,
}

/// Audit section for one input record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSection {
    /// The record's identifying-key value, `None` when it lacks the key.
    pub ref_value: Option<String>,
    /// One entry per merged remote record, empty when unmatched.
    pub merges: Vec<RemoteMerge>,
    /// Set when the record was appended as a new synthetic record.
    pub added: Option<NewRecord>,
}

/// Audit section for one orphaned remote record: it carries the
/// identifying key but no input record matched it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrphanSection {
    pub remote_id: i64,
    pub kind: ElementKind,
    /// The record's tags after the not-found marker was applied.
    pub tags: BTreeMap<String, String>,
}

/// The complete audit trail of one reconciliation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub ref_key: String,
    pub sections: Vec<InputSection>,
    pub orphans: Vec<OrphanSection>,
    pub stats: ReconcileStats,
}

impl AuditReport {
    /// Render the report as the update log text.
    pub fn render(&self, input_name: &str, date: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Log file for updating {input_name} on {date}\n"
        ));

        for section in &self.sections {
            out.push('\n');
            match &section.ref_value {
                Some(value) => out.push_str(&format!("{}: {}\n", self.ref_key, value)),
                None => out.push_str(&format!("NO {} KEY\n", self.ref_key.to_uppercase())),
            }

            for merge in &section.merges {
                if section.merges.len() > 1 {
                    out.push_str(&format!("    Matched {} {}\n", merge.kind, merge.remote_id));
                }
                for decision in &merge.decisions {
                    render_decision(&mut out, decision);
                }
            }

            if let Some(new_record) = &section.added {
                out.push_str("    ADDED NEW OBJECT TO OUTPUT FILE:\n");
                for (key, value) in &new_record.tags {
                    out.push_str(&format!("    {key}='{value}'\n"));
                }
            }
        }

        for orphan in &self.orphans {
            out.push_str("\nOBJECT IN OSM NOT FOUND IN INPUT FILE:\n");
            for (key, value) in &orphan.tags {
                out.push_str(&format!("    {key}='{value}'\n"));
            }
        }

        out.push_str(&format!(
            "\nSummary:\n  Updated:  {}\n  Added:    {}\n  No match: {}\n",
            self.stats.updated, self.stats.added, self.stats.orphaned
        ));
        out
    }
}

/// Render one decision line. Keeps are only shown when an exception rule
/// was involved.
fn render_decision(out: &mut String, decision: &TagDecision) {
    match decision {
        TagDecision::Kept {
            key,
            value,
            reason: Some(_),
        } => {
            out.push_str(&format!("    {:<10}{}='{}'\n", "Keep:", key, value));
        }
        TagDecision::Kept { reason: None, .. } => {}
        TagDecision::Replaced { key, old, new } => {
            out.push_str(&format!(
                "    {:<10}{}='{}' with '{}'\n",
                "Replaced:", key, old, new
            ));
        }
        TagDecision::Deleted { key, old } => {
            out.push_str(&format!("    {:<10}{}='{}'\n", "Deleted:", key, old));
        }
        TagDecision::Added { key, value } => {
            out.push_str(&format!("    {:<10}{}='{}'\n", "Added:", key, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RetainReason;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_report() -> AuditReport {
        AuditReport {
            ref_key: "ref:xx".to_string(),
            sections: vec![
                InputSection {
                    ref_value: Some("100".to_string()),
                    merges: vec![RemoteMerge {
                        remote_id: 1,
                        kind: ElementKind::Node,
                        decisions: vec![
                            TagDecision::Kept {
                                key: "ref:xx".to_string(),
                                value: "100".to_string(),
                                reason: None,
                            },
                            TagDecision::Replaced {
                                key: "name".to_string(),
                                old: "Old".to_string(),
                                new: "New".to_string(),
                            },
                            TagDecision::Kept {
                                key: "website".to_string(),
                                value: "http://x.no".to_string(),
                                reason: Some(RetainReason::SchemeUpgrade),
                            },
                        ],
                    }],
                    added: None,
                },
                InputSection {
                    ref_value: None,
                    merges: Vec::new(),
                    added: Some(NewRecord {
                        id: -1001,
                        tags: tags(&[("name", "Ny stasjon")]),
                    }),
                },
            ],
            orphans: vec![OrphanSection {
                remote_id: 9,
                kind: ElementKind::Node,
                tags: tags(&[("ref:xx", "999"), ("NOT_FOUND", "yes")]),
            }],
            stats: ReconcileStats {
                updated: 1,
                added: 1,
                orphaned: 1,
            },
        }
    }

    #[test]
    fn renders_sections_in_order() {
        let text = sample_report().render("stations.osm", "2024-05-01");
        let replaced = text.find("Replaced: name='Old' with 'New'").unwrap();
        let added_new = text.find("ADDED NEW OBJECT TO OUTPUT FILE:").unwrap();
        let orphan = text.find("OBJECT IN OSM NOT FOUND IN INPUT FILE:").unwrap();
        let summary = text.find("Summary:").unwrap();
        assert!(replaced < added_new && added_new < orphan && orphan < summary);
        assert!(text.starts_with("Log file for updating stations.osm on 2024-05-01\n"));
    }

    #[test]
    fn uneventful_keeps_are_not_rendered() {
        let text = sample_report().render("stations.osm", "2024-05-01");
        assert!(!text.contains("ref:xx='100'"));
        assert!(!text.contains("Keep:     ref:xx"));
        assert!(text.contains("Keep:     website='http://x.no'"));
    }

    #[test]
    fn missing_ref_key_header_is_uppercased() {
        let text = sample_report().render("stations.osm", "2024-05-01");
        assert!(text.contains("NO REF:XX KEY\n"));
        assert!(text.contains("    name='Ny stasjon'\n"));
    }

    #[test]
    fn orphan_tags_include_not_found_marker() {
        let text = sample_report().render("stations.osm", "2024-05-01");
        assert!(text.contains("    NOT_FOUND='yes'\n"));
        assert!(text.contains("    ref:xx='999'\n"));
    }

    #[test]
    fn summary_carries_the_three_counters() {
        let text = sample_report().render("stations.osm", "2024-05-01");
        assert!(text.contains("  Updated:  1\n"));
        assert!(text.contains("  Added:    1\n"));
        assert!(text.contains("  No match: 1\n"));
    }

    #[test]
    fn multi_match_sections_mark_each_remote() {
        let mut report = sample_report();
        report.sections[0].merges = vec![
            RemoteMerge {
                remote_id: 1,
                kind: ElementKind::Node,
                decisions: Vec::new(),
            },
            RemoteMerge {
                remote_id: 2,
                kind: ElementKind::Way,
                decisions: Vec::new(),
            },
        ];
        let text = report.render("stations.osm", "2024-05-01");
        assert!(text.contains("    Matched node 1\n"));
        assert!(text.contains("    Matched way 2\n"));
    }
}
