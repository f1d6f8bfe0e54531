//! Error types for docx2epub operations.

use thiserror::Error;

/// Errors that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// The source document could not be turned into HTML.
    #[error("could not convert document: {0}")]
    Normalization(String),

    /// The EPUB archive could not be assembled.
    #[error("could not build EPUB archive: {0}")]
    Packaging(String),

    /// The input was rejected before conversion started.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Packaging(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
