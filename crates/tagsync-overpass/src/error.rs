//! Error types for the Overpass client.

/// Errors from fetching the remote dataset.
#[derive(Debug, thiserror::Error)]
pub enum OverpassError {
    /// The HTTP request failed, timed out, returned an error status, or
    /// produced a body that was not a valid element collection.
    #[error("overpass request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Convenience alias for Overpass results.
pub type OverpassResult<T> = Result<T, OverpassError>;
