//! Turning source documents into HTML the segmenter can work on.
//!
//! The [`Normalizer`] trait is the seam between the conversion pipeline and
//! whatever understands the source format. [`DocxNormalizer`] reads Word
//! documents directly; [`HtmlNormalizer`] accepts HTML that was produced
//! elsewhere.

mod docx;

pub use docx::DocxNormalizer;

use crate::error::Result;
use crate::util::{decode_text, extract_html_charset};

/// HTML produced from a source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHtml {
    /// HTML body fragment.
    pub html: String,
    /// Non-fatal warnings about content that could not be represented.
    pub messages: Vec<String>,
}

/// Converts raw document bytes to HTML.
pub trait Normalizer {
    fn to_html(&self, bytes: &[u8]) -> Result<NormalizedHtml>;
}

/// Passthrough for documents that are already HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlNormalizer;

impl Normalizer for HtmlNormalizer {
    fn to_html(&self, bytes: &[u8]) -> Result<NormalizedHtml> {
        let html = decode_text(bytes, extract_html_charset(bytes)).into_owned();
        Ok(NormalizedHtml {
            html,
            messages: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_passthrough() {
        let out = HtmlNormalizer.to_html(b"<h1>A</h1><p>b</p>").unwrap();
        assert_eq!(out.html, "<h1>A</h1><p>b</p>");
        assert!(out.messages.is_empty());
    }

    #[test]
    fn test_html_uses_declared_charset() {
        let mut bytes = br#"<meta charset="windows-1250"><p>"#.to_vec();
        bytes.push(0x9A); // 'š' in CP1250
        bytes.extend_from_slice(b"</p>");

        let out = HtmlNormalizer.to_html(&bytes).unwrap();
        assert!(out.html.ends_with("<p>\u{161}</p>"));
    }
}
