//! Error types for OSM file I/O.

/// Errors reading or writing OSM XML documents.
#[derive(Debug, thiserror::Error)]
pub enum OsmError {
    /// Underlying file or stream I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The document was not well-formed XML.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document was well-formed XML but not a usable OSM file.
    #[error("malformed osm document: {0}")]
    Malformed(String),
}

/// Convenience alias for OSM I/O results.
pub type OsmResult<T> = Result<T, OsmError>;
