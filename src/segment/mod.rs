//! Chapter segmentation.
//!
//! Splits a normalized HTML document into an ordered list of [`Chapter`]s.
//! Two boundary heuristics are available and are never mixed within one
//! run; see [`SegmentStrategy`].
//!
//! # Example
//!
//! ```
//! use docx2epub::segment::{SegmentStrategy, segment};
//!
//! let chapters = segment(
//!     "<h1>Intro</h1><p>Hello</p><h1>End</h1><p>Bye</p>",
//!     SegmentStrategy::Headings,
//! );
//! assert_eq!(chapters.len(), 2);
//! assert_eq!(chapters[0].id, "chapter-1");
//! assert_eq!(chapters[0].content, "<h1>Intro</h1><p>Hello</p>");
//! assert_eq!(chapters[1].title, "End");
//! ```

mod headings;
mod pattern;

pub use pattern::is_chapter_marker;

use crate::dom::{HtmlTree, parse_html};

/// One logical section of the output book.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Chapter {
    /// `chapter-{n}`, 1-based, in reading order.
    pub id: String,
    /// Display title; never empty.
    pub title: String,
    /// XHTML-compatible fragment.
    pub content: String,
}

impl Chapter {
    /// Build the chapter at 1-based position `number`.
    ///
    /// A blank title is replaced by [`Chapter::placeholder_title`].
    pub fn new(number: usize, title: &str, content: String) -> Self {
        let title = title.trim();
        let title = if title.is_empty() {
            Self::placeholder_title(number)
        } else {
            title.to_string()
        };
        Self {
            id: format!("chapter-{number}"),
            title,
            content,
        }
    }

    /// Title used when the source heading has no text.
    pub fn placeholder_title(number: usize) -> String {
        format!("Chapter {number}")
    }

    /// File name of the chapter document inside `OEBPS/`.
    pub fn file_name(&self) -> String {
        format!("{}.xhtml", self.id)
    }
}

/// How chapter boundaries are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SegmentStrategy {
    /// Every `h1`, `h2` or `h3` element starts a chapter.
    #[default]
    Headings,
    /// Headings and paragraphs whose text starts with `Capitolul N` or
    /// `Capitol N` start a chapter.
    Pattern,
}

/// Parse `html` and split it into chapters.
///
/// Never fails and always returns at least one chapter.
pub fn segment(html: &str, strategy: SegmentStrategy) -> Vec<Chapter> {
    let dom = parse_html(html);
    segment_tree(&dom, strategy)
}

/// Split an already parsed tree into chapters.
pub fn segment_tree<T: HtmlTree>(tree: &T, strategy: SegmentStrategy) -> Vec<Chapter> {
    let chapters = match strategy {
        SegmentStrategy::Headings => headings::split(tree),
        SegmentStrategy::Pattern => pattern::split(tree),
    };
    tracing::debug!(?strategy, chapters = chapters.len(), "segmented document");
    chapters
}

/// Elements that precede `target` inside `scope`, as whole subtrees in
/// document order.
///
/// Walks up from `target`; at every level the element siblings before the
/// current ancestor are taken, so wrappers around `target` are entered
/// rather than skipped.
fn elements_before<T: HtmlTree>(tree: &T, scope: T::Node, target: T::Node) -> Vec<T::Node> {
    let mut levels = Vec::new();
    let mut current = target;
    while current != scope {
        let Some(parent) = tree.parent(current) else {
            break;
        };
        let before: Vec<T::Node> = tree
            .children(parent)
            .take_while(|&n| n != current)
            .filter(|&n| tree.is_element(n))
            .collect();
        levels.push(before);
        current = parent;
    }
    levels.into_iter().rev().flatten().collect()
}

/// Serialize a run of nodes and join them once.
fn concat_html<T: HtmlTree>(tree: &T, nodes: &[T::Node]) -> String {
    nodes
        .iter()
        .map(|&n| tree.outer_html(n))
        .collect::<Vec<_>>()
        .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_blank_title_uses_placeholder() {
        let chapter = Chapter::new(3, "   \n", String::new());
        assert_eq!(chapter.title, "Chapter 3");
        assert_eq!(chapter.id, "chapter-3");
        assert_eq!(chapter.file_name(), "chapter-3.xhtml");
    }

    #[test]
    fn test_chapter_title_is_trimmed() {
        let chapter = Chapter::new(1, "  Intro \n", String::new());
        assert_eq!(chapter.title, "Intro");
    }

    #[test]
    fn test_default_strategy_is_headings() {
        assert_eq!(SegmentStrategy::default(), SegmentStrategy::Headings);
    }

    #[test]
    fn test_strategies_disagree_on_mixed_document() {
        let html = "<h1>Preface</h1><p>Capitolul 1</p><p>a</p><p>Capitolul 2</p><p>b</p>";

        let by_heading = segment(html, SegmentStrategy::Headings);
        let by_pattern = segment(html, SegmentStrategy::Pattern);

        assert_eq!(by_heading.len(), 1);
        assert_eq!(by_pattern.len(), 2);
    }
}
