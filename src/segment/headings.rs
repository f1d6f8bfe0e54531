//! Heading-tag segmentation: `h1`–`h3` elements open chapters.

use std::iter;

use crate::dom::HtmlTree;

use super::{Chapter, concat_html, elements_before};

const EMPTY_CONTENT: &str = "<p>Empty content</p>";

fn is_chapter_heading(tag: Option<&str>) -> bool {
    matches!(tag, Some("h1" | "h2" | "h3"))
}

pub(super) fn split<T: HtmlTree>(tree: &T) -> Vec<Chapter> {
    let body = tree.body();
    let headings: Vec<T::Node> = tree
        .descendant_elements(body)
        .into_iter()
        .filter(|&n| is_chapter_heading(tree.tag_name(n)))
        .collect();

    let Some(&first) = headings.first() else {
        return vec![Chapter::new(1, "", tree.inner_html(body))];
    };

    let preamble = elements_before(tree, body, first);

    headings
        .iter()
        .enumerate()
        .map(|(i, &heading)| {
            let next = headings.get(i + 1).copied();
            let mut nodes = if i == 0 { preamble.clone() } else { Vec::new() };
            nodes.extend(section(tree, body, heading, next));

            let content = concat_html(tree, &nodes);
            let content = if content.is_empty() {
                EMPTY_CONTENT.to_string()
            } else {
                content
            };
            Chapter::new(i + 1, &tree.text_content(heading), content)
        })
        .collect()
}

/// The heading plus everything up to the next heading.
///
/// Following siblings are taken in order. A sibling that wraps the next
/// heading is entered and only its elements before that heading are taken.
/// When a level runs out, the walk continues after the enclosing element,
/// up to `body`.
fn section<T: HtmlTree>(
    tree: &T,
    body: T::Node,
    heading: T::Node,
    next: Option<T::Node>,
) -> Vec<T::Node> {
    let mut nodes = vec![heading];
    if next.is_some_and(|n| tree.contains(heading, n)) {
        return nodes;
    }
    let mut current = heading;
    loop {
        let followers = iter::successors(tree.next_element_sibling(current), |&n| {
            tree.next_element_sibling(n)
        });
        for sibling in followers {
            if let Some(next) = next
                && tree.contains(sibling, next)
            {
                nodes.extend(elements_before(tree, sibling, next));
                return nodes;
            }
            nodes.push(sibling);
        }
        match tree.parent(current) {
            Some(parent) if parent != body => current = parent,
            _ => return nodes,
        }
    }
}
