//! ZIP assembly of an EPUB file set.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::entries::ArchiveEntries;
use crate::error::{Error, Result};
use crate::input::EPUB_MEDIA_TYPE;

/// Path of the EPUB signature entry.
pub const MIMETYPE_PATH: &str = "mimetype";

/// Compression hint for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    Deflated,
}

/// Sink that turns a sequence of files into one archive blob.
pub trait ArchiveWriter {
    fn append(&mut self, path: &str, data: &[u8], compression: Compression) -> Result<()>;

    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// [`ArchiveWriter`] backed by the `zip` crate, writing to memory.
pub struct ZipArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    compression_level: Option<i64>,
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            compression_level: None,
        }
    }

    /// Deflate level (0-9); the zip crate default is used when unset.
    pub fn with_compression_level(mut self, level: Option<u32>) -> Self {
        self.compression_level = level.map(i64::from);
        self
    }
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn append(&mut self, path: &str, data: &[u8], compression: Compression) -> Result<()> {
        let options = match compression {
            Compression::Stored => {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            }
            Compression::Deflated => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.compression_level),
        };

        self.zip.start_file(path, options)?;
        self.zip
            .write_all(data)
            .map_err(|e| Error::Packaging(format!("{path}: {e}")))?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

/// Write `entries` through `writer`.
///
/// `mimetype` always goes first and uncompressed; it is synthesized if the
/// entry set lacks one. Everything else is deflated in insertion order.
pub fn write_archive<A: ArchiveWriter>(entries: &ArchiveEntries, mut writer: A) -> Result<Vec<u8>> {
    let mimetype = entries
        .get(MIMETYPE_PATH)
        .map(|c| c.as_bytes())
        .unwrap_or(EPUB_MEDIA_TYPE.as_bytes());
    writer.append(MIMETYPE_PATH, mimetype, Compression::Stored)?;

    for entry in entries.iter().filter(|e| e.path != MIMETYPE_PATH) {
        writer.append(&entry.path, entry.content.as_bytes(), Compression::Deflated)?;
    }

    let bytes = writer.finish()?;
    tracing::debug!(entries = entries.len(), bytes = bytes.len(), "wrote archive");
    Ok(bytes)
}
