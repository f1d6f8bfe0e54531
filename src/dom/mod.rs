//! HTML parsing into a navigable arena tree.
//!
//! # Example
//!
//! ```
//! use docx2epub::dom::{HtmlTree, parse_html};
//!
//! let dom = parse_html("<h1>Intro</h1><p>Hello</p>");
//! let body = dom.body();
//! let first = dom.children(body).next().unwrap();
//! assert_eq!(dom.tag_name(first), Some("h1"));
//! assert_eq!(dom.outer_html(first), "<h1>Intro</h1>");
//! ```

mod arena;
mod serialize;
mod tree;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, ChildrenIter};
pub use serialize::escape_xml;
pub(crate) use serialize::escape_text;
pub use tree::{Children, HtmlTree};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML document or fragment.
///
/// Fragments are wrapped in `html`/`body` by the parser, the same way a
/// browser's `DOMParser` would.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
