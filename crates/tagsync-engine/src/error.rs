//! Error types for the reconciliation engine.

/// Errors that can occur while preparing or running a reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input dataset carries two distinct reference keys. Matching is
    /// defined over a single identifying key, so this aborts before any
    /// remote fetch.
    #[error("more than one reference key found in input dataset: '{first}' and '{second}'")]
    ConflictingRefKeys { first: String, second: String },

    /// No reference key was found anywhere in the input dataset.
    #[error("no reference key found in input dataset")]
    MissingRefKey,

    /// A merge policy file could not be read.
    #[error("failed to read merge policy: {0}")]
    PolicyIo(#[from] std::io::Error),

    /// A merge policy file could not be parsed.
    #[error("failed to parse merge policy: {0}")]
    PolicyParse(#[from] toml::de::Error),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
