//! EPUB 3 packaging.
//!
//! [`EpubPackager`] lays chapters out as an [`ArchiveEntries`] file set;
//! [`write_archive`] turns that set into ZIP bytes through an
//! [`ArchiveWriter`].
//!
//! ```
//! use docx2epub::epub::{EpubPackager, ZipArchiveWriter, write_archive};
//! use docx2epub::segment::{SegmentStrategy, segment};
//!
//! let chapters = segment("<h1>One</h1><p>a</p>", SegmentStrategy::Headings);
//! let entries = EpubPackager::new().package(&chapters, "Book", None);
//! let bytes = write_archive(&entries, ZipArchiveWriter::new()).unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

mod archive;
mod documents;
mod entries;
mod package;

pub use archive::{ArchiveWriter, Compression, MIMETYPE_PATH, ZipArchiveWriter, write_archive};
pub use entries::{ArchiveEntries, ArchiveEntry, EntryContent};
pub use package::{DEFAULT_MODIFIED, EpubConfig, EpubPackager, book_identifier};
