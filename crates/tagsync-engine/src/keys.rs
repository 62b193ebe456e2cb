//! Key classification: ownership prefixes and administrative keys.
//!
//! Tag keys are namespaced with `:` (`fuel:diesel`, `contact:website`). The
//! ownership prefix of a key is its namespace up to and including the first
//! delimiter, or the whole key when it has none. Prefixes are the unit of
//! the equal-prefix governance rule: an input dataset that carries any
//! `fuel:` key claims authority over every `fuel:` key on the remote side.

/// Delimiter separating a key's namespace from its local part.
pub const NAMESPACE_DELIMITER: char = ':';

/// Returns the ownership prefix of a tag key.
///
/// For a namespaced key this is the substring up to and including the first
/// delimiter (`fuel:diesel` -> `fuel:`); a bare key is its own prefix
/// (`phone` -> `phone`).
pub fn ownership_prefix(key: &str) -> &str {
    match key.find(NAMESPACE_DELIMITER) {
        Some(pos) => &key[..=pos],
        None => key,
    }
}

/// Returns `true` if the key is administrative, i.e. contains no lower-case
/// letters (`NOT_FOUND`, `FIXME`).
///
/// Administrative keys are bookkeeping markers, not feature data. They are
/// excluded from the governed vocabulary and never copied from input
/// records; the merger leaves them untouched in both directions.
pub fn is_administrative(key: &str) -> bool {
    !key.chars().any(char::is_lowercase)
}
