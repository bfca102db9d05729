// ABOUTME: Text-pass layer shared by the minify and pretty-print stages.
// ABOUTME: Holds the tag classification tables that drive whitespace and line-break decisions.

//! String-level HTML passes.
//!
//! The pipeline's first and last stages work on markup as text, not as a
//! DOM: minification runs before any parse (and again after serialization),
//! and pretty-printing shapes the final line structure. Both are built on
//! one tokenizer ([`scan`]) so they agree on what a tag, comment, or
//! raw-text block is.

pub mod minify;
pub mod pretty;
pub(crate) mod scan;

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that flow within a line of text rather than starting a block.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "i", "img",
    "ins", "kbd", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u",
    "var", "wbr",
];

/// Elements whose content the tokenizer must not interpret as markup.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea"];

/// Elements whose text children keep their whitespace byte-for-byte.
const PRESERVE_TAGS: &[&str] = &["pre", "textarea"];

/// Elements whose content the pretty-printer emits verbatim.
const UNFORMATTED_TAGS: &[&str] = &["pre", "script", "style", "textarea"];

fn tag_in(name: &str, set: &[&str]) -> bool {
    set.iter().any(|t| t.eq_ignore_ascii_case(name))
}

pub(crate) fn is_void(name: &str) -> bool {
    tag_in(name, VOID_TAGS)
}

pub(crate) fn is_inline(name: &str) -> bool {
    tag_in(name, INLINE_TAGS)
}

pub(crate) fn is_raw_text(name: &str) -> bool {
    tag_in(name, RAW_TEXT_TAGS)
}

pub(crate) fn is_preserve(name: &str) -> bool {
    tag_in(name, PRESERVE_TAGS)
}

pub(crate) fn is_unformatted(name: &str) -> bool {
    tag_in(name, UNFORMATTED_TAGS)
}
