//! Merge policy: the configurable knobs of the reconciliation engine.
//!
//! The default policy reproduces the behavior used for the national fuel
//! station and toll station imports. A TOML file can override any field,
//! so new datasets with their own exception rules do not require code
//! changes.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// One brand-retention entry: when a matched input record carries this
/// brand, the listed remote keys survive the delete path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRetention {
    pub brand: String,
    pub keys: BTreeSet<String>,
}

/// Configuration for exception rules and match multiplicity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Keys eligible for the https scheme-upgrade tolerance.
    pub scheme_upgrade_keys: BTreeSet<String>,

    /// Identifying keys for which the remote `name` tag is never replaced.
    pub locked_name_refs: BTreeSet<String>,

    /// Brand-specific retention entries, checked in order on the delete
    /// path.
    pub retain_on_brand: Vec<BrandRetention>,

    /// Identifying keys matched with multi-match semantics: every remote
    /// record sharing the value is merged, instead of only the first.
    pub multi_match_refs: BTreeSet<String>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            scheme_upgrade_keys: string_set(&["website", "url", "contact:website"]),
            locked_name_refs: string_set(&["ref:toll"]),
            retain_on_brand: vec![BrandRetention {
                brand: "YX 7-Eleven".to_string(),
                keys: string_set(&["phone", "email"]),
            }],
            multi_match_refs: string_set(&["ref:toll"]),
        }
    }
}

impl MergePolicy {
    /// Parse a policy from TOML text. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a policy from a TOML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Returns `true` if the identifying key uses multi-match semantics.
    pub fn multi_match(&self, ref_key: &str) -> bool {
        self.multi_match_refs.contains(ref_key)
    }

    /// Returns `true` if `name` is locked for the identifying key.
    pub fn locks_name(&self, ref_key: &str) -> bool {
        self.locked_name_refs.contains(ref_key)
    }
}

fn string_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}
