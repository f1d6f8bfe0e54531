//! Input validation and naming rules.
//!
//! Documents and cover images are checked here, before any conversion work
//! starts, so that a wrong file type is reported as
//! [`Error::UnsupportedInput`] instead of a parse failure deep in the
//! pipeline.

use crate::error::{Error, Result};
use crate::util::{file_extension, file_stem};

/// MIME type of Word documents.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type of the produced archive.
pub const EPUB_MEDIA_TYPE: &str = "application/epub+zip";

/// Extensions accepted for cover images.
pub const COVER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Source format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Word document, normalized by [`crate::normalize::DocxNormalizer`].
    Docx,
    /// HTML that is already normalized.
    Html,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match file_extension(name)?.as_str() {
            "docx" => Some(DocumentKind::Docx),
            "html" | "htm" | "xhtml" => Some(DocumentKind::Html),
            _ => None,
        }
    }

    /// Detect the kind from a MIME type.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            DOCX_MEDIA_TYPE => Some(DocumentKind::Docx),
            "text/html" | "application/xhtml+xml" => Some(DocumentKind::Html),
            _ => None,
        }
    }
}

/// A validated source document.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    name: String,
    kind: DocumentKind,
    data: Vec<u8>,
}

impl DocumentInput {
    /// Validate a document by file name.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let kind = DocumentKind::from_file_name(&name).ok_or_else(|| {
            Error::UnsupportedInput(format!("{name}: expected a .docx document"))
        })?;
        Self::validated(name, kind, data)
    }

    /// Validate a document by its declared MIME type.
    pub fn with_media_type(
        name: impl Into<String>,
        media_type: &str,
        data: Vec<u8>,
    ) -> Result<Self> {
        let name = name.into();
        let kind = DocumentKind::from_media_type(media_type).ok_or_else(|| {
            Error::UnsupportedInput(format!("{name}: unsupported media type {media_type}"))
        })?;
        Self::validated(name, kind, data)
    }

    fn validated(name: String, kind: DocumentKind, data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::UnsupportedInput(format!("{name}: file is empty")));
        }
        if kind == DocumentKind::Docx && !data.starts_with(ZIP_MAGIC) {
            return Err(Error::UnsupportedInput(format!(
                "{name}: not a Word document (missing ZIP signature)"
            )));
        }
        Ok(Self { name, kind, data })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Book title derived from the file name.
    pub fn title(&self) -> &str {
        file_stem(&self.name)
    }

    /// File name for the converted book.
    pub fn epub_file_name(&self) -> String {
        epub_file_name(&self.name)
    }
}

/// `{name without extension}.epub`
pub fn epub_file_name(input_name: &str) -> String {
    format!("{}.epub", file_stem(input_name))
}

/// Cover image to embed in the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverAsset {
    data: Vec<u8>,
    extension: String,
    media_type: &'static str,
}

impl CoverAsset {
    /// Build a cover from the uploaded file's name and bytes.
    ///
    /// Files without an extension are treated as JPEG.
    pub fn new(file_name: &str, data: Vec<u8>) -> Result<Self> {
        let extension = file_extension(file_name).unwrap_or_else(|| "jpg".to_string());
        if !COVER_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::UnsupportedInput(format!(
                "{file_name}: cover must be one of {}",
                COVER_EXTENSIONS.join(", ")
            )));
        }
        if data.is_empty() {
            return Err(Error::UnsupportedInput(format!(
                "{file_name}: cover image is empty"
            )));
        }

        let media_type = if extension == "png" {
            "image/png"
        } else {
            "image/jpeg"
        };

        Ok(Self {
            data,
            extension,
            media_type,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// Path relative to the package document, e.g. `images/cover.png`.
    pub fn href(&self) -> String {
        format!("images/cover.{}", self.extension)
    }
}
