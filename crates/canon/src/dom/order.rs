// ABOUTME: Structural canonicalization: head child reordering and attribute sorting.
// ABOUTME: Makes serialization order deterministic without changing document content.

//! Ordering passes.
//!
//! Two documents that differ only in the order of `<head>` children or of an
//! element's attributes are the same document for comparison purposes. These
//! passes rewrite both orders into a canonical form so the difference
//! disappears from the serialized text.

use dom_query::{Document, NodeRef, Selection};

use crate::dom::walk;

/// Head tag categories in canonical order. Anything else ranks last.
const HEAD_TAG_ORDER: &[&str] = &["title", "meta", "base", "link", "style", "script", "noscript"];

/// Reorder the direct children of `<head>` into category order, breaking ties
/// by full lexicographic comparison of each child's serialized markup.
///
/// Unknown tags rank after every known category and are reported, not
/// rejected. The head is rebuilt by reparsing the reordered markup block.
pub fn reorder_head(doc: &Document) {
    let head = doc.select("head");
    if head.is_empty() {
        return;
    }
    let Some(head_node) = head.nodes().first() else {
        return;
    };

    let mut entries: Vec<(usize, String)> = Vec::new();
    for child in element_children(head_node) {
        let name = child
            .node_name()
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        let rank = match HEAD_TAG_ORDER.iter().position(|t| *t == name) {
            Some(rank) => rank,
            None => {
                tracing::warn!("unexpected tag <{}> in head; ordering it last", name);
                HEAD_TAG_ORDER.len()
            }
        };
        entries.push((rank, Selection::from(child).html().to_string()));
    }
    if entries.len() < 2 {
        return;
    }
    entries.sort();

    let markup: String = entries.into_iter().map(|(_, m)| m).collect();
    head.set_html(markup);
}

/// Sort every element's attributes into ascending lexicographic name order.
///
/// Runs over a materialized pre-order traversal of the whole document. For
/// each element the current pairs are captured, removed, and re-added sorted;
/// the attribute set and values are unchanged.
pub fn sort_attributes(doc: &Document) {
    for node in walk::elements(doc) {
        let mut attrs: Vec<(String, String)> = node
            .attrs()
            .iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect();
        if attrs.is_empty() {
            continue;
        }
        for (name, _) in &attrs {
            node.remove_attr(name);
        }
        attrs.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in &attrs {
            node.set_attr(name, value);
        }
    }
}

fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut child = node.first_child();
    while let Some(c) = child {
        child = c.next_sibling();
        if c.is_element() {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_categories_reorder() {
        let doc = Document::from(
            "<html><head><script>s()</script><title>T</title><meta charset=\"utf-8\"></head><body></body></html>",
        );
        reorder_head(&doc);
        let head = doc.select("head").inner_html().to_string();
        let title = head.find("<title").unwrap();
        let meta = head.find("<meta").unwrap();
        let script = head.find("<script").unwrap();
        assert!(title < meta, "got head: {}", head);
        assert!(meta < script, "got head: {}", head);
    }

    #[test]
    fn test_same_category_sorts_by_markup() {
        let doc = Document::from(
            "<html><head><meta name=\"b\"><meta name=\"a\"></head><body></body></html>",
        );
        reorder_head(&doc);
        let head = doc.select("head").inner_html().to_string();
        assert!(
            head.find("name=\"a\"").unwrap() < head.find("name=\"b\"").unwrap(),
            "got head: {}",
            head
        );
    }

    #[test]
    fn test_unknown_tag_ranks_last() {
        let doc = Document::from(
            "<html><head><template id=\"t\"></template><title>T</title></head><body></body></html>",
        );
        reorder_head(&doc);
        let head = doc.select("head").inner_html().to_string();
        assert!(
            head.find("<title").unwrap() < head.find("<template").unwrap(),
            "got head: {}",
            head
        );
    }

    #[test]
    fn test_document_without_head_children_is_untouched() {
        let doc = Document::from("<html><head></head><body><p>x</p></body></html>");
        reorder_head(&doc);
        assert_eq!(doc.select("head").inner_html().to_string(), "");
    }

    #[test]
    fn test_attributes_sort_lexicographically() {
        let doc = Document::from("<body><div title=\"t\" class=\"c\" id=\"i\">x</div></body>");
        sort_attributes(&doc);
        let html = doc.select("div").html().to_string();
        let class = html.find("class=").unwrap();
        let id = html.find("id=").unwrap();
        let title = html.find("title=").unwrap();
        assert!(class < id && id < title, "got: {}", html);
    }

    #[test]
    fn test_attribute_values_survive_sorting() {
        let doc = Document::from("<body><div b=\"2\" a=\"1\">x</div></body>");
        sort_attributes(&doc);
        let div = doc.select("div");
        assert_eq!(div.attr("a").as_deref(), Some("1"));
        assert_eq!(div.attr("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_order_only_difference_serializes_identically() {
        let first = Document::from("<body><div a=\"1\" b=\"2\">x</div></body>");
        let second = Document::from("<body><div b=\"2\" a=\"1\">x</div></body>");
        sort_attributes(&first);
        sort_attributes(&second);
        assert_eq!(first.html().to_string(), second.html().to_string());
    }
}
