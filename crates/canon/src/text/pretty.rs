// ABOUTME: Pretty-printer producing the line structure of the canonical text.
// ABOUTME: Block tags break lines, inline content flows, unformatted blocks pass verbatim.

//! Pretty-printing and indentation flattening.
//!
//! The canonical text is compared line by line, so where lines break is the
//! contract of this pass:
//! - Block-level start tags, comments, and doctype declarations begin a new
//!   line; inline elements and text continue the current one.
//! - A block element whose whole content stayed on the line its start tag
//!   opened closes on that same line (`<p>text</p>`).
//! - `script`/`style`/`textarea`/`pre` content is emitted verbatim between
//!   the start-tag line and the end-tag line, trimmed of surrounding
//!   whitespace so a second canonicalization reproduces the same lines.
//! - Indentation is one space per depth level; [`flatten_indent`] strips it
//!   afterwards, because indentation is a build artifact that would cause
//!   spurious line diffs.

use super::scan::{Scanner, Token};
use super::{is_inline, is_raw_text, is_unformatted, is_void};
use crate::error::CanonError;

struct Printer {
    lines: Vec<String>,
    current: String,
    depth: usize,
    /// Lowercased name of the block tag that started the current line, when
    /// nothing else has been flushed since. Drives same-line closing.
    line_tag: Option<String>,
}

impl Printer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            depth: 0,
            line_tag: None,
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.line_tag = None;
    }

    fn append(&mut self, piece: &str) {
        if self.current.is_empty() {
            for _ in 0..self.depth {
                self.current.push(' ');
            }
        }
        self.current.push_str(piece);
    }

    /// Emit verbatim content lines of an unformatted element.
    fn emit_verbatim(&mut self, content: &str) {
        let trimmed = content.trim_matches([' ', '\t', '\n', '\r', '\x0c']);
        if trimmed.is_empty() {
            return;
        }
        self.flush();
        for line in trimmed.split('\n') {
            self.lines.push(line.trim_end_matches('\r').to_string());
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.lines.join("\n")
    }
}

/// Pretty-print minified markup into the canonical line structure.
pub fn pretty(html: &str) -> Result<String, CanonError> {
    let mut p = Printer::new();
    // Verbatim capture of a `pre` subtree: (tag, buffered source, nesting).
    let mut capture: Option<(String, String, usize)> = None;

    for token in Scanner::new(html) {
        let token =
            token.map_err(|e| CanonError::minify("PrettyPrint", Some(anyhow::anyhow!(e))))?;

        if let Some((tag, buf, nesting)) = capture.as_mut() {
            match &token {
                Token::Start {
                    name, self_closing, ..
                } if name.eq_ignore_ascii_case(tag) && !self_closing => {
                    *nesting += 1;
                    buf.push_str(token.raw());
                }
                Token::End { name, .. } if name.eq_ignore_ascii_case(tag) => {
                    if *nesting == 0 {
                        let (_, buf, _) = capture.take().unwrap();
                        p.emit_verbatim(&buf);
                        close_block(&mut p, &token);
                    } else {
                        *nesting -= 1;
                        buf.push_str(token.raw());
                    }
                }
                _ => buf.push_str(token.raw()),
            }
            continue;
        }

        match token {
            Token::Decl(raw) | Token::Comment(raw) => {
                p.flush();
                p.append(raw);
                p.flush();
            }
            Token::Text(text) => p.append(text),
            Token::Raw(text) => p.emit_verbatim(text),
            Token::Start {
                name,
                raw,
                self_closing,
            } => {
                if is_inline(name) {
                    p.append(raw);
                    continue;
                }
                p.flush();
                p.append(raw);
                let lowered = name.to_ascii_lowercase();
                if !self_closing && !is_void(&lowered) {
                    p.depth += 1;
                    if is_unformatted(&lowered) && !is_raw_text(&lowered) {
                        capture = Some((lowered.clone(), String::new(), 0));
                    }
                }
                p.line_tag = Some(lowered);
            }
            token @ Token::End { .. } => {
                if let Token::End { name, raw } = &token {
                    if is_inline(name) {
                        p.append(raw);
                        continue;
                    }
                }
                close_block(&mut p, &token);
            }
        }
    }

    if let Some((_, buf, _)) = capture.take() {
        p.emit_verbatim(&buf);
    }
    Ok(p.finish())
}

/// Emit a block-level end tag, on the start tag's line when the whole
/// element fit there, otherwise on its own line.
fn close_block(p: &mut Printer, token: &Token<'_>) {
    let Token::End { name, raw } = token else {
        return;
    };
    p.depth = p.depth.saturating_sub(1);
    let same_line = !p.current.is_empty()
        && p.line_tag
            .as_deref()
            .is_some_and(|open| open.eq_ignore_ascii_case(name));
    if same_line {
        p.current.push_str(raw);
        p.flush();
    } else {
        p.flush();
        p.append(raw);
        p.flush();
    }
}

/// Strip leading spaces and tabs from every line.
pub fn flatten_indent(text: &str) -> String {
    text.lines()
        .map(|line| line.trim_start_matches([' ', '\t']))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_get_their_own_lines() {
        let out = pretty("<div><p>a</p><p>b</p></div>").unwrap();
        assert_eq!(out, "<div>\n <p>a</p>\n <p>b</p>\n</div>");
    }

    #[test]
    fn test_inline_content_stays_on_one_line() {
        let out = pretty("<p>Hello<b>big</b>world</p>").unwrap();
        assert_eq!(out, "<p>Hello<b>big</b>world</p>");
    }

    #[test]
    fn test_void_block_does_not_swallow_close() {
        let out = pretty("<head><meta charset=\"utf-8\"></head>").unwrap();
        assert_eq!(out, "<head>\n <meta charset=\"utf-8\">\n</head>");
    }

    #[test]
    fn test_comment_gets_own_line() {
        let out = pretty("<div><!-- note --></div>").unwrap();
        assert_eq!(out, "<div>\n <!-- note -->\n</div>");
    }

    #[test]
    fn test_script_content_verbatim() {
        let out = pretty("<script>var a = 1;\nvar b = 2;</script>").unwrap();
        assert_eq!(out, "<script>\nvar a = 1;\nvar b = 2;\n</script>");
    }

    #[test]
    fn test_empty_script_closes_on_same_line() {
        let out = pretty("<script></script>").unwrap();
        assert_eq!(out, "<script></script>");
    }

    #[test]
    fn test_pre_subtree_is_verbatim() {
        let out = pretty("<pre>line one\n  <b>two</b></pre>").unwrap();
        assert_eq!(out, "<pre>\nline one\n  <b>two</b>\n</pre>");
    }

    #[test]
    fn test_nested_pre_stays_inside_capture() {
        let out = pretty("<pre>a<pre>b</pre>c</pre>").unwrap();
        assert_eq!(out, "<pre>\na<pre>b</pre>c\n</pre>");
    }

    #[test]
    fn test_indentation_uses_single_space_unit() {
        let out = pretty("<div><div><p>x</p></div></div>").unwrap();
        assert_eq!(out, "<div>\n <div>\n  <p>x</p>\n </div>\n</div>");
    }

    #[test]
    fn test_flatten_indent_strips_spaces_and_tabs() {
        assert_eq!(flatten_indent("  a\n\tb\n \t c"), "a\nb\nc");
    }

    #[test]
    fn test_flatten_keeps_interior_whitespace() {
        assert_eq!(flatten_indent("  a  b"), "a  b");
    }

    #[test]
    fn test_doctype_on_own_line() {
        let out = pretty("<!DOCTYPE html><html><body></body></html>").unwrap();
        assert_eq!(out, "<!DOCTYPE html>\n<html>\n <body></body>\n</html>");
    }
}
