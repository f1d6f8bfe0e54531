//! XHTML-compatible serialization of arena nodes.
//!
//! Chapter fragments end up inside XHTML documents, so output must be
//! well-formed XML: void elements are self-closed and text is escaped.

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// HTML elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Escape XML special characters (for text and attribute values).
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Append `s` to `out`, escaping the characters that are special in text.
pub(crate) fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Serialize a node including its own tag.
pub fn outer_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, &mut out);
    out
}

/// Serialize only the children of a node.
pub fn inner_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    for child in dom.children(id) {
        write_node(dom, child, &mut out);
    }
    out
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Element { name, attrs } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix.as_ref());
                    out.push(':');
                }
                out.push_str(attr.name.local.as_ref());
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }

            if VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        ArenaNodeData::Text(text) => escape_text(text, out),
        ArenaNodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
        }
        ArenaNodeData::Comment(_) | ArenaNodeData::Doctype { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_outer_html_round_trips_simple_markup() {
        let dom = parse_html("<p class=\"x\">Hi <em>there</em></p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(outer_html(&dom, p), "<p class=\"x\">Hi <em>there</em></p>");
    }

    #[test]
    fn test_void_elements_self_close() {
        let dom = parse_html("<p>a<br>b<img src=\"x.png\" alt=\"\"></p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(
            outer_html(&dom, p),
            "<p>a<br/>b<img src=\"x.png\" alt=\"\"/></p>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let dom = parse_html("<p>Tom &amp; Jerry &lt;3</p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(outer_html(&dom, p), "<p>Tom &amp; Jerry &lt;3</p>");
    }

    #[test]
    fn test_comments_are_dropped() {
        let dom = parse_html("<div><!-- note --><p>x</p></div>");
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(inner_html(&dom, div), "<p>x</p>");
    }
}
