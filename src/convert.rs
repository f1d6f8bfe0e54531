//! The conversion pipeline: normalize, segment, package, zip.

use crate::epub::{EpubConfig, EpubPackager, ZipArchiveWriter, write_archive};
use crate::error::Result;
use crate::input::{CoverAsset, DocumentInput, DocumentKind};
use crate::normalize::{DocxNormalizer, HtmlNormalizer, NormalizedHtml, Normalizer};
use crate::segment::{Chapter, SegmentStrategy, segment};

/// Options for a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Book title; the document file name without extension when unset.
    pub title: Option<String>,
    pub strategy: SegmentStrategy,
    pub epub: EpubConfig,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_strategy(mut self, strategy: SegmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_epub_config(mut self, epub: EpubConfig) -> Self {
        self.epub = epub;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.epub = self.epub.with_author(author);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.epub = self.epub.with_language(language);
        self
    }
}

/// Runs the document → EPUB pipeline.
///
/// Word documents go through the normalizer `N`; HTML documents are
/// decoded and segmented as they are.
///
/// # Example
///
/// ```
/// use docx2epub::{Converter, DocumentInput};
///
/// let input = DocumentInput::new("Book.html", b"<h1>One</h1><p>x</p>".to_vec()).unwrap();
/// let epub = Converter::new().convert(&input, None).unwrap();
/// assert!(epub.starts_with(b"PK"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter<N = DocxNormalizer> {
    normalizer: N,
    options: ConvertOptions,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: Normalizer> Converter<N> {
    /// Replace the Word document normalizer.
    pub fn with_normalizer<M: Normalizer>(self, normalizer: M) -> Converter<M> {
        Converter {
            normalizer,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Normalize and segment without packaging.
    pub fn chapters(&self, input: &DocumentInput) -> Result<Vec<Chapter>> {
        let normalized = self.normalize(input)?;
        Ok(segment(&normalized.html, self.options.strategy))
    }

    /// Convert a validated document to EPUB bytes.
    pub fn convert(&self, input: &DocumentInput, cover: Option<&CoverAsset>) -> Result<Vec<u8>> {
        let chapters = self.chapters(input)?;
        let title = self.options.title.as_deref().unwrap_or_else(|| input.title());

        let entries = EpubPackager::new()
            .with_config(self.options.epub.clone())
            .package(&chapters, title, cover);
        let writer =
            ZipArchiveWriter::new().with_compression_level(self.options.epub.compression_level);
        let bytes = write_archive(&entries, writer)?;

        tracing::info!(
            input = input.name(),
            title,
            chapters = chapters.len(),
            cover = cover.is_some(),
            bytes = bytes.len(),
            "converted document"
        );
        Ok(bytes)
    }

    fn normalize(&self, input: &DocumentInput) -> Result<NormalizedHtml> {
        let normalized = match input.kind() {
            DocumentKind::Docx => self.normalizer.to_html(input.data())?,
            DocumentKind::Html => HtmlNormalizer.to_html(input.data())?,
        };
        for message in &normalized.messages {
            tracing::warn!(input = input.name(), "{message}");
        }
        Ok(normalized)
    }
}

/// Convert a Word document with default options.
///
/// The title is `file_name` without its extension; a cover is embedded when
/// given.
pub fn convert_docx_to_epub(
    bytes: &[u8],
    file_name: &str,
    cover: Option<&CoverAsset>,
) -> Result<Vec<u8>> {
    let input = DocumentInput::new(file_name, bytes.to_vec())?;
    Converter::new().convert(&input, cover)
}
