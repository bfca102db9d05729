// ABOUTME: Materialized pre-order element traversal of a parsed document.
// ABOUTME: Structural passes iterate the returned handles, never a live view.

use dom_query::{Document, NodeRef};

/// Collect every element of the document in pre-order: root first, then each
/// child subtree left to right, depth first.
///
/// The whole traversal is materialized before the caller mutates anything, so
/// the returned handles stay valid while attributes are rewritten.
pub(crate) fn elements(doc: &Document) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        if node.is_element() {
            out.push(node.clone());
        }
        // Children go on the stack last-first so they pop left-to-right.
        let mut children = Vec::new();
        let mut child = node.first_child();
        while let Some(c) = child {
            child = c.next_sibling();
            children.push(c);
        }
        while let Some(c) = children.pop() {
            stack.push(c);
        }
    }
    out
}
