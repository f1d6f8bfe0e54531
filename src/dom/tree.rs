//! Navigable tree interface used by the chapter segmenter.
//!
//! The segmenter only needs a handful of operations, so it works against this
//! trait instead of the arena directly. Tests can hand-build trees without
//! going through the HTML parser.

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use super::serialize;

/// Read-only view over a parsed HTML document.
pub trait HtmlTree {
    /// Copyable node handle.
    type Node: Copy + Eq;

    /// The element whose children make up the document content.
    fn body(&self) -> Self::Node;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Lower-case tag name, or `None` for non-element nodes.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, node: Self::Node) -> String;

    /// Serialized markup of the node including its own tag.
    fn outer_html(&self, node: Self::Node) -> String;

    /// Serialized markup of the node's children.
    fn inner_html(&self, node: Self::Node) -> String;

    /// Iterate over the direct children of `node`.
    fn children(&self, node: Self::Node) -> Children<'_, Self>
    where
        Self: Sized,
    {
        Children {
            tree: self,
            next: self.first_child(node),
        }
    }

    fn is_element(&self, node: Self::Node) -> bool {
        self.tag_name(node).is_some()
    }

    /// Next sibling that is an element, skipping text and comments.
    fn next_element_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let mut current = self.next_sibling(node);
        while let Some(n) = current {
            if self.is_element(n) {
                return Some(n);
            }
            current = self.next_sibling(n);
        }
        None
    }

    /// All elements below `root` in document (pre-)order, excluding `root`.
    fn descendant_elements(&self, root: Self::Node) -> Vec<Self::Node>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(root).collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
            }
            let mut kids: Vec<_> = self.children(node).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// True if `node` is `ancestor` or lies somewhere below it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}

/// Iterator over the children of a node.
pub struct Children<'a, T: HtmlTree> {
    tree: &'a T,
    next: Option<T::Node>,
}

impl<T: HtmlTree> Iterator for Children<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

impl HtmlTree for ArenaDom {
    type Node = ArenaNodeId;

    fn body(&self) -> ArenaNodeId {
        self.find_by_tag("body").unwrap_or_else(|| self.document())
    }

    fn first_child(&self, node: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(node).and_then(|n| n.first_child.get())
    }

    fn next_sibling(&self, node: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(node).and_then(|n| n.next_sibling.get())
    }

    fn parent(&self, node: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(node).and_then(|n| n.parent.get())
    }

    fn tag_name(&self, node: ArenaNodeId) -> Option<&str> {
        self.element_name(node).map(|n| n.as_ref())
    }

    fn text_content(&self, node: ArenaNodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(n) = self.get(id) else { continue };
            match &n.data {
                ArenaNodeData::Text(text) => out.push_str(text),
                ArenaNodeData::Element { .. } | ArenaNodeData::Document => {
                    let mut kids: Vec<_> = ArenaDom::children(self, id).collect();
                    kids.reverse();
                    stack.extend(kids);
                }
                _ => {}
            }
        }
        out
    }

    fn outer_html(&self, node: ArenaNodeId) -> String {
        serialize::outer_html(self, node)
    }

    fn inner_html(&self, node: ArenaNodeId) -> String {
        serialize::inner_html(self, node)
    }
}
