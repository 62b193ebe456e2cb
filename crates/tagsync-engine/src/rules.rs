//! Exception rules: narrow overrides of the default replace/delete decision.
//!
//! Each rule is a predicate over the merge context. The first applicable
//! rule short-circuits, and the tag merger keeps the remote value instead
//! of replacing or deleting it. No applicable rule means the default
//! decision stands.

use std::collections::BTreeMap;
use std::fmt;

use crate::policy::MergePolicy;

/// Why a remote tag was kept despite a differing or absent input value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetainReason {
    /// The input value is the remote value with its scheme upgraded.
    SchemeUpgrade,
    /// `name` is locked for this identifying key.
    LockedName,
    /// Brand-specific retention of contact tags.
    BrandRetention,
}

impl RetainReason {
    /// Short human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RetainReason::SchemeUpgrade => "https upgrade",
            RetainReason::LockedName => "locked name",
            RetainReason::BrandRetention => "brand retention",
        }
    }
}

impl fmt::Display for RetainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule check on the replace path, where `key` exists on both sides with
/// differing values. Returns the first applicable retention reason.
pub fn retain_on_replace(
    policy: &MergePolicy,
    ref_key: &str,
    key: &str,
    remote_value: &str,
    input_value: &str,
) -> Option<RetainReason> {
    if policy.scheme_upgrade_keys.contains(key) && is_scheme_upgrade(remote_value, input_value) {
        return Some(RetainReason::SchemeUpgrade);
    }
    if key == "name" && policy.locks_name(ref_key) {
        return Some(RetainReason::LockedName);
    }
    None
}

/// Rule check on the delete path, where `key` is governed but absent from
/// the matched input record's tags.
pub fn retain_on_delete(
    policy: &MergePolicy,
    input_tags: &BTreeMap<String, String>,
    key: &str,
) -> Option<RetainReason> {
    let brand = input_tags.get("brand")?;
    for entry in &policy.retain_on_brand {
        if !entry.brand.is_empty() && entry.brand == *brand && entry.keys.contains(key) {
            return Some(RetainReason::BrandRetention);
        }
    }
    None
}

/// Returns `true` if `input` equals `remote` with the `http` scheme
/// upgraded to `https`, optionally with `www.` inserted after the scheme,
/// optionally with a trailing slash appended.
fn is_scheme_upgrade(remote: &str, input: &str) -> bool {
    let Some(rest) = remote.strip_prefix("http://") else {
        return false;
    };
    let upgraded = format!("https://{rest}");
    let with_www = format!("https://www.{rest}");
    input == upgraded
        || input == format!("{upgraded}/")
        || input == with_www
        || input == format!("{with_www}/")
}
