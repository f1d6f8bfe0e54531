//! Builds the EPUB file set from segmented chapters.

use super::archive::MIMETYPE_PATH;
use super::documents::{
    BookInfo, CONTAINER_XML, COVER_PAGE, NAV_PAGE, NCX_FILE, generate_chapter,
    generate_cover_page, generate_nav, generate_ncx, generate_opf,
};
use super::entries::ArchiveEntries;
use crate::input::{CoverAsset, EPUB_MEDIA_TYPE};
use crate::segment::Chapter;

/// Timestamp written when none is configured, so output is reproducible.
pub const DEFAULT_MODIFIED: &str = "2024-01-01T00:00:00Z";

/// Configuration for EPUB packaging.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// `dc:creator` value.
    pub author: String,
    /// `dc:language` value.
    pub language: String,
    /// Heading of the navigation document.
    pub toc_title: String,
    /// Fixed identifier; derived from title and chapter ids when unset.
    pub identifier: Option<String>,
    /// `dcterms:modified` value; [`DEFAULT_MODIFIED`] when unset.
    pub modified: Option<String>,
    /// Compression level for deflate (0-9).
    pub compression_level: Option<u32>,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            author: "Unknown".to_string(),
            language: "ro".to_string(),
            toc_title: "Contents".to_string(),
            identifier: None,
            modified: None,
            compression_level: None,
        }
    }
}

impl EpubConfig {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_toc_title(mut self, title: impl Into<String>) -> Self {
        self.toc_title = title.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_modified(mut self, modified: impl Into<String>) -> Self {
        self.modified = Some(modified.into());
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level.min(9));
        self
    }
}

/// Lays out chapters, navigation and cover as EPUB archive entries.
///
/// # Example
///
/// ```
/// use docx2epub::epub::EpubPackager;
/// use docx2epub::segment::Chapter;
///
/// let chapters = vec![Chapter::new(1, "Intro", "<h1>Intro</h1>".to_string())];
/// let entries = EpubPackager::new().package(&chapters, "My Book", None);
///
/// assert_eq!(entries.text("mimetype"), Some("application/epub+zip"));
/// assert!(entries.contains("OEBPS/chapter-1.xhtml"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubPackager {
    config: EpubConfig,
}

impl EpubPackager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EpubConfig {
        &self.config
    }

    /// Produce every file of the book. Deterministic for equal inputs.
    pub fn package(
        &self,
        chapters: &[Chapter],
        title: &str,
        cover: Option<&CoverAsset>,
    ) -> ArchiveEntries {
        let identifier = self
            .config
            .identifier
            .clone()
            .unwrap_or_else(|| book_identifier(title, chapters));
        let book = BookInfo {
            identifier: &identifier,
            title,
            author: &self.config.author,
            language: &self.config.language,
            modified: self.config.modified.as_deref().unwrap_or(DEFAULT_MODIFIED),
            toc_title: &self.config.toc_title,
        };

        let mut entries = ArchiveEntries::new();
        entries.insert_text(MIMETYPE_PATH, EPUB_MEDIA_TYPE);
        entries.insert_text("META-INF/container.xml", CONTAINER_XML);
        entries.insert_text("OEBPS/content.opf", generate_opf(&book, chapters, cover));

        if let Some(cover) = cover {
            entries.insert_text(
                format!("OEBPS/{COVER_PAGE}"),
                generate_cover_page(&book, cover),
            );
        }

        entries.insert_text(format!("OEBPS/{NAV_PAGE}"), generate_nav(&book, chapters));
        entries.insert_text(format!("OEBPS/{NCX_FILE}"), generate_ncx(&book, chapters));

        for chapter in chapters {
            entries.insert_text(
                format!("OEBPS/{}", chapter.file_name()),
                generate_chapter(&book, chapter),
            );
        }

        if let Some(cover) = cover {
            entries.insert_bytes(format!("OEBPS/{}", cover.href()), cover.data().to_vec());
        }

        tracing::debug!(
            chapters = chapters.len(),
            entries = entries.len(),
            cover = cover.is_some(),
            "packaged EPUB"
        );
        entries
    }
}

/// Stable `urn:uuid:` identifier derived from the title and chapter ids.
///
/// Uses the SHA-1 digest laid out as a version 5 UUID.
pub fn book_identifier(title: &str, chapters: &[Chapter]) -> String {
    let mut hasher = sha1_smol::Sha1::new();
    hasher.update(title.as_bytes());
    for chapter in chapters {
        hasher.update(b"\0");
        hasher.update(chapter.id.as_bytes());
    }
    let digest = hasher.digest().bytes();

    let mut b = [0u8; 16];
    b.copy_from_slice(&digest[..16]);
    b[6] = (b[6] & 0x0f) | 0x50;
    b[8] = (b[8] & 0x3f) | 0x80;

    let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
    format!(
        "urn:uuid:{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
