// ABOUTME: Markup minification: comment stripping, whitespace collapsing, entity decoding.
// ABOUTME: Runs on the raw input before parsing and again on the serialized document.

//! Minification.
//!
//! Two different pipeline stages reduce markup to a canonical compact form:
//! the raw input is minified before the parse (comments stripped), and the
//! serialized document is minified again at the end (comments kept, so
//! replacement markers survive).
//!
//! Key behaviors:
//! - Text between tags: entities decode to literal characters (`<`, `>` and
//!   `&` stay escaped so the result reparses identically), ASCII whitespace
//!   runs collapse to one space, and segments are trimmed against their
//!   neighboring tags. Whitespace-only segments disappear, including the
//!   space around inline tags.
//! - Removing a comment joins the text on either side of it into one
//!   segment before collapsing.
//! - `pre`/`textarea` text and `script`/`style` content pass through
//!   byte-for-byte.
//! - Inside tags, whitespace outside quoted values collapses to one space.
//! - Scanner failures (unterminated comment/tag/raw-text element) surface
//!   as minify errors; the pipeline's recovery option handles them.

use htmlentity::entity::{decode, ICodedDataTrait};

use super::scan::{Scanner, Token};
use super::{is_preserve, is_void};
use crate::error::CanonError;

/// Minify markup, stripping comments.
pub fn minify(html: &str) -> Result<String, CanonError> {
    run(html, false, "Minify")
}

/// Minify markup, keeping comments verbatim.
pub fn minify_keep_comments(html: &str) -> Result<String, CanonError> {
    run(html, true, "Reminify")
}

fn run(html: &str, keep_comments: bool, op: &str) -> Result<String, CanonError> {
    let mut out = String::with_capacity(html.len());
    let mut pending_text = String::new();
    let mut preserve_depth = 0usize;

    for token in Scanner::new(html) {
        let token = token.map_err(|e| CanonError::minify(op, Some(anyhow::anyhow!(e))))?;
        match token {
            Token::Text(text) => {
                if preserve_depth > 0 {
                    out.push_str(text);
                } else {
                    pending_text.push_str(text);
                }
            }
            Token::Comment(raw) => {
                if keep_comments {
                    flush_text(&mut out, &mut pending_text);
                    out.push_str(raw);
                }
            }
            Token::Raw(text) => {
                flush_text(&mut out, &mut pending_text);
                out.push_str(text);
            }
            Token::Decl(raw) => {
                flush_text(&mut out, &mut pending_text);
                out.push_str(raw);
            }
            Token::Start {
                name,
                raw,
                self_closing,
            } => {
                flush_text(&mut out, &mut pending_text);
                out.push_str(&collapse_tag_whitespace(raw));
                if is_preserve(name) && !self_closing && !is_void(name) {
                    preserve_depth += 1;
                }
            }
            Token::End { name, raw } => {
                flush_text(&mut out, &mut pending_text);
                out.push_str(&collapse_tag_whitespace(raw));
                if is_preserve(name) {
                    preserve_depth = preserve_depth.saturating_sub(1);
                }
            }
        }
    }
    flush_text(&mut out, &mut pending_text);
    Ok(out)
}

fn flush_text(out: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let cleaned = clean_text(pending);
    out.push_str(&cleaned);
    pending.clear();
}

/// Decode entities, collapse ASCII whitespace, trim, re-escape markup
/// characters.
fn clean_text(text: &str) -> String {
    let decoded = decode_entities(text);
    let collapsed = collapse_whitespace(&decoded);
    escape_markup(&collapsed)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    decode(text.as_bytes())
        .to_string()
        .unwrap_or_else(|_| text.to_string())
}

/// Collapse runs of ASCII whitespace to a single space and trim both ends.
///
/// Only ASCII whitespace participates; U+00A0 and friends are content.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c') {
            in_ws = true;
        } else {
            if in_ws && !out.is_empty() {
                out.push(' ');
            }
            in_ws = false;
            out.push(ch);
        }
    }
    out
}

fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Collapse whitespace runs inside a tag, outside quoted attribute values.
fn collapse_tag_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut quote: Option<char> = None;
    let mut in_ws = false;
    for ch in raw.chars() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c') {
            in_ws = true;
            continue;
        }
        if in_ws {
            in_ws = false;
            if ch != '>' && ch != '/' {
                out.push(' ');
            }
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        }
        out.push(ch);
    }
    out
}
