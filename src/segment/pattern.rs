//! Text-pattern segmentation: `Capitolul N` / `Capitol N` markers open
//! chapters.

use std::iter;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::HtmlTree;

use super::{Chapter, concat_html, elements_before};

const FULL_DOCUMENT_TITLE: &str = "Full document";
const MISSING_CONTENT: &str = "<p>Content unavailable</p>";

static CHAPTER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^capitol(?:ul)?\s+\d+\b").expect("chapter marker regex is valid")
});

/// True if `text` opens with a chapter marker.
pub fn is_chapter_marker(text: &str) -> bool {
    CHAPTER_MARKER.is_match(text.trim())
}

fn is_marker_tag(tag: Option<&str>) -> bool {
    matches!(tag, Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p"))
}

pub(super) fn split<T: HtmlTree>(tree: &T) -> Vec<Chapter> {
    let body = tree.body();

    let mut markers: Vec<T::Node> = Vec::new();
    for node in tree.descendant_elements(body) {
        if !is_marker_tag(tree.tag_name(node)) || !is_chapter_marker(&tree.text_content(node)) {
            continue;
        }
        // Document order means an enclosing marker is already recorded.
        if markers.iter().any(|&m| tree.contains(m, node)) {
            continue;
        }
        markers.push(node);
    }

    let Some(&first) = markers.first() else {
        return vec![Chapter::new(1, FULL_DOCUMENT_TITLE, tree.inner_html(body))];
    };

    let is_boundary = |n: T::Node| markers.iter().any(|&m| tree.contains(n, m));
    let preamble = elements_before(tree, body, first);

    markers
        .iter()
        .enumerate()
        .map(|(i, &marker)| {
            let next = markers.get(i + 1).copied();
            let mut nodes = if i == 0 { preamble.clone() } else { Vec::new() };
            nodes.push(marker);

            let mut following = run_until_boundary(tree, marker, next, &is_boundary);
            if following.is_empty()
                && let Some(parent) = tree.parent(marker)
                && parent != body
            {
                following = run_until_boundary(tree, parent, next, &is_boundary);
            }

            let content = if following.is_empty() {
                format!("{}{MISSING_CONTENT}", concat_html(tree, &nodes))
            } else {
                nodes.extend(following);
                concat_html(tree, &nodes)
            };
            Chapter::new(i + 1, &tree.text_content(marker), content)
        })
        .collect()
}

/// Element siblings after `start`, stopping at the first chapter boundary.
///
/// If that boundary wraps `next`, its elements before `next` are taken too.
fn run_until_boundary<T: HtmlTree>(
    tree: &T,
    start: T::Node,
    next: Option<T::Node>,
    is_boundary: &impl Fn(T::Node) -> bool,
) -> Vec<T::Node> {
    let mut nodes = Vec::new();
    let followers = iter::successors(tree.next_element_sibling(start), |&n| {
        tree.next_element_sibling(n)
    });
    for sibling in followers {
        if is_boundary(sibling) {
            if let Some(next) = next
                && sibling != next
                && tree.contains(sibling, next)
            {
                nodes.extend(elements_before(tree, sibling, next));
            }
            break;
        }
        nodes.push(sibling);
    }
    nodes
}
