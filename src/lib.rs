//! # docx2epub
//!
//! Converts Word documents into EPUB 3 books.
//!
//! The pipeline has four stages:
//!
//! 1. [`normalize`] turns the document into HTML,
//! 2. [`segment`] splits the HTML into [`Chapter`]s,
//! 3. [`epub::EpubPackager`] lays the chapters out as EPUB files,
//! 4. [`epub::write_archive`] zips them with `mimetype` first.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docx2epub::{CoverAsset, convert_docx_to_epub, epub_file_name};
//!
//! let bytes = std::fs::read("Roman.docx").unwrap();
//! let cover = CoverAsset::new("cover.png", std::fs::read("cover.png").unwrap()).unwrap();
//! let epub = convert_docx_to_epub(&bytes, "Roman.docx", Some(&cover)).unwrap();
//! std::fs::write(epub_file_name("Roman.docx"), epub).unwrap();
//! ```
//!
//! ## Choosing chapter boundaries
//!
//! ```
//! use docx2epub::{ConvertOptions, Converter, DocumentInput, SegmentStrategy};
//!
//! let html = b"<p>Capitolul 1</p><p>Era odata...</p><p>Capitolul 2</p><p>Sfarsit</p>";
//! let input = DocumentInput::new("Poveste.html", html.to_vec()).unwrap();
//! let converter = Converter::new()
//!     .with_options(ConvertOptions::new().with_strategy(SegmentStrategy::Pattern));
//!
//! let chapters = converter.chapters(&input).unwrap();
//! assert_eq!(chapters.len(), 2);
//! assert_eq!(chapters[1].title, "Capitolul 2");
//! ```

pub mod convert;
pub mod dom;
pub mod epub;
pub mod error;
pub mod input;
pub mod normalize;
pub mod segment;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use convert::{ConvertOptions, Converter, convert_docx_to_epub};
pub use epub::{EpubConfig, EpubPackager};
pub use error::{Error, Result};
pub use input::{CoverAsset, DocumentInput, DocumentKind, EPUB_MEDIA_TYPE, epub_file_name};
pub use normalize::{DocxNormalizer, HtmlNormalizer, NormalizedHtml, Normalizer};
pub use segment::{Chapter, SegmentStrategy, segment};
