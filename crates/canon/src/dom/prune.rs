// ABOUTME: The element and attribute pruners driven by the cleaning configuration.
// ABOUTME: Selects via the cached matchers, filters content, then removes or empties.

//! Rule-driven pruning.
//!
//! Element rules run first, attribute rules second, each list in order; a
//! later rule sees the tree as left by earlier ones. Within a rule the match
//! set is collected up front, then mutated element by element.
//!
//! Key behaviors:
//! - A rule missing its required field (`selector` / `attribute`) is skipped.
//! - An invalid selector aborts the pass with the rule's JSON attached; a
//!   malformed configuration is a caller bug, not something to degrade around.
//! - Element rules filter on the element's inner markup; attribute rules
//!   filter on the attribute's value (the empty string is a real value).
//! - An emptied element gets its replacement as a comment child, `<!-- text -->`,
//!   never as raw markup, so it survives serialization untouched.

use dom_query::{Document, Selection};

use crate::config::{AttributeAction, AttributeRule, ElementAction, ElementRule};
use crate::error::CanonError;
use crate::matcher::ContentFilter;
use crate::selector;

/// Apply the `elements` rule list to the document, in order.
pub fn apply_element_rules(doc: &Document, rules: &[ElementRule]) -> Result<(), CanonError> {
    for rule in rules {
        let Some(css) = rule.selector.as_deref() else {
            tracing::debug!("element rule without selector skipped");
            continue;
        };
        let Some(matcher) = selector::get_or_compile(css) else {
            return Err(CanonError::selector(
                "ElementRules",
                rule.to_json(),
                Some(anyhow::anyhow!("cannot parse selector {css:?}")),
            ));
        };
        let filter = ContentFilter::new(
            rule.contains.as_deref(),
            rule.contains_regex.as_deref(),
            rule.contains_regex_flags.as_deref(),
        );
        let action = rule.action();

        let nodes = doc.select_matcher(&matcher).nodes().to_vec();
        for node in nodes {
            let sel = Selection::from(node);
            if !filter.matches(&sel.inner_html()) {
                continue;
            }
            match action {
                ElementAction::Remove => sel.remove(),
                ElementAction::Empty => match rule.replacement.as_deref() {
                    Some(replacement) => sel.set_html(format!("<!-- {} -->", replacement)),
                    None => sel.set_html(""),
                },
                ElementAction::Keep => {}
            }
        }
    }
    Ok(())
}

/// Apply the `attributes` rule list to the document, in order.
pub fn apply_attribute_rules(doc: &Document, rules: &[AttributeRule]) -> Result<(), CanonError> {
    for rule in rules {
        let Some(name) = rule.attribute.as_deref() else {
            tracing::debug!("attribute rule without attribute name skipped");
            continue;
        };
        let css = rule.selector.as_deref().unwrap_or("*");
        let Some(matcher) = selector::get_or_compile(css) else {
            return Err(CanonError::selector(
                "AttributeRules",
                rule.to_json(),
                Some(anyhow::anyhow!("cannot parse selector {css:?}")),
            ));
        };
        let filter = ContentFilter::new(
            rule.contains.as_deref(),
            rule.contains_regex.as_deref(),
            rule.contains_regex_flags.as_deref(),
        );
        let action = rule.action();

        let nodes = doc.select_matcher(&matcher).nodes().to_vec();
        for node in nodes {
            let sel = Selection::from(node);
            let Some(value) = sel.attr(name) else {
                continue;
            };
            if !filter.matches(&value) {
                continue;
            }
            match action {
                AttributeAction::Empty => {
                    sel.set_attr(name, rule.replacement.as_deref().unwrap_or(""));
                }
                AttributeAction::Remove => sel.remove_attr(name),
                AttributeAction::Keep => {}
            }
        }
    }
    Ok(())
}
