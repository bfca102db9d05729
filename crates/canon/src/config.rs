// ABOUTME: Cleaning configuration data model consumed from JSON.
// ABOUTME: Defines element/attribute rule lists and resolves each rule's effective action.

//! Declarative cleaning configuration.
//!
//! A configuration is two independent ordered rule lists: `elements` rules
//! select whole elements and remove or empty them; `attributes` rules select
//! elements and remove or empty one named attribute. Rules apply in list
//! order and later rules see the tree as left by earlier ones.
//!
//! Key behaviors:
//! - Field names are camelCase on the wire (`containsRegex`, not
//!   `contains_regex`).
//! - An element rule with neither `remove` nor `empty` empties; `remove`
//!   overrides `empty` when both are set.
//! - An attribute rule with neither `remove` nor `empty` removes; `empty`
//!   overrides `remove` when both are set. The two precedence directions are
//!   deliberately opposite.
//! - A rule missing its required field (`selector` / `attribute`) is skipped,
//!   not an error.

use serde::{Deserialize, Serialize};

use crate::error::CanonError;

/// What an element rule does to a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    /// Detach the element from its parent.
    Remove,
    /// Delete the element's children (optionally leaving a comment marker).
    Empty,
    /// Match but mutate nothing.
    Keep,
}

/// What an attribute rule does to a matched attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeAction {
    /// Set the attribute's value to the replacement or the empty string.
    Empty,
    /// Delete the attribute.
    Remove,
    /// Match but mutate nothing.
    Keep,
}

/// A rule targeting whole elements.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementRule {
    /// CSS selector for the elements this rule applies to. Required; the
    /// rule is skipped when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Literal substring the element's inner markup must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    /// Regex the element's inner markup must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_regex: Option<String>,
    /// Flags for `containsRegex`, JavaScript alphabet (`i`, `m`, `s`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_regex_flags: Option<String>,
    /// Remove matched elements outright. Wins over `empty`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<bool>,
    /// Empty matched elements. Defaults to true when neither `remove` nor
    /// `empty` was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    /// Marker text for emptied elements, injected as a comment child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl ElementRule {
    /// Resolve the rule's effective action from its `remove`/`empty` pair.
    pub fn action(&self) -> ElementAction {
        if self.remove.unwrap_or(false) {
            return ElementAction::Remove;
        }
        let neither = self.remove.is_none() && self.empty.is_none();
        if self.empty.unwrap_or(neither) {
            ElementAction::Empty
        } else {
            ElementAction::Keep
        }
    }

    /// Serialized form of the rule for error reporting.
    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<unserializable rule>".to_string())
    }
}

/// A rule targeting one named attribute on selected elements.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRule {
    /// Name of the attribute this rule applies to. Required; the rule is
    /// skipped when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// CSS selector scoping the rule. Defaults to every element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Literal substring the attribute's value must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    /// Regex the attribute's value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_regex: Option<String>,
    /// Flags for `containsRegex`, JavaScript alphabet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_regex_flags: Option<String>,
    /// Remove the attribute. Defaults to true when neither `remove` nor
    /// `empty` was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<bool>,
    /// Empty the attribute's value instead of removing it. Wins over
    /// `remove`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    /// Value to set when emptying; empty string when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl AttributeRule {
    /// Resolve the rule's effective action from its `remove`/`empty` pair.
    ///
    /// Precedence runs the opposite way from element rules: `empty` wins.
    pub fn action(&self) -> AttributeAction {
        if self.empty.unwrap_or(false) {
            return AttributeAction::Empty;
        }
        let neither = self.remove.is_none() && self.empty.is_none();
        if self.remove.unwrap_or(neither) {
            AttributeAction::Remove
        } else {
            AttributeAction::Keep
        }
    }

    /// Serialized form of the rule for error reporting.
    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<unserializable rule>".to_string())
    }
}

/// The full cleaning configuration: ordered element and attribute rule lists.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CleaningConfig {
    /// Rules applied to whole elements, in order.
    #[serde(default)]
    pub elements: Vec<ElementRule>,
    /// Rules applied to attributes, in order, after all element rules.
    #[serde(default)]
    pub attributes: Vec<AttributeRule>,
}

impl CleaningConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CanonError> {
        serde_json::from_str(json)
            .map_err(|e| CanonError::config("LoadConfig", Some(anyhow::anyhow!(e))))
    }

    /// Parse a configuration from a reader (file or piped input).
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, CanonError> {
        serde_json::from_reader(reader)
            .map_err(|e| CanonError::config("LoadConfig", Some(anyhow::anyhow!(e))))
    }

    /// True when both rule lists are empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.attributes.is_empty()
    }

    /// Every selector string mentioned by any rule, for cache warming.
    pub(crate) fn selectors(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter_map(|r| r.selector.as_deref())
            .chain(self.attributes.iter().filter_map(|r| r.selector.as_deref()))
    }
}
