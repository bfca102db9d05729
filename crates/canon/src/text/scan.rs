// ABOUTME: Lightweight quote-aware HTML tokenizer feeding the minify and pretty-print passes.
// ABOUTME: Yields verbatim source slices; unterminated constructs are hard errors.

//! HTML tokenization for the text passes.
//!
//! This is deliberately not a full HTML tokenizer: the DOM library
//! does the real parsing. The text passes only need to know where tags,
//! comments, and raw-text blocks begin and end, while keeping every byte of
//! the source addressable, so tokens carry `&str` slices of the input.
//!
//! Key behaviors:
//! - Start tags scan quote-aware, so `>` inside a quoted attribute value
//!   does not end the tag.
//! - `script`, `style` and `textarea` content is scanned to the matching
//!   case-insensitive close tag without interpreting markup in between.
//! - A `<` that does not begin a tag, comment, or declaration is literal
//!   text.
//! - Unterminated comments, tags (including an unclosed quoted value), and
//!   raw-text elements are errors; the minify stage reports them as a
//!   malformed-markup failure.

use super::is_raw_text;

/// Scanner failure, positioned by byte offset into the input.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("unterminated comment at byte {0}")]
    UnterminatedComment(usize),
    #[error("unterminated tag at byte {0}")]
    UnterminatedTag(usize),
    #[error("unterminated <{tag}> element at byte {pos}")]
    UnterminatedRawText { tag: String, pos: usize },
}

/// One lexical item of an HTML document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Doctype, CDATA section, processing instruction, or other markup
    /// declaration, verbatim including delimiters.
    Decl(&'a str),
    /// A comment, verbatim including `<!--` and `-->`.
    Comment(&'a str),
    /// A start tag. `name` is the verbatim tag name (original case).
    Start {
        name: &'a str,
        raw: &'a str,
        self_closing: bool,
    },
    /// An end tag.
    End { name: &'a str, raw: &'a str },
    /// A text run between tags.
    Text(&'a str),
    /// Verbatim content of a raw-text element, emitted between its start
    /// and end tags (empty when the element has no content).
    Raw(&'a str),
}

impl<'a> Token<'a> {
    /// The verbatim source slice this token covers.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Decl(raw) | Token::Comment(raw) | Token::Text(raw) | Token::Raw(raw) => raw,
            Token::Start { raw, .. } | Token::End { raw, .. } => raw,
        }
    }
}

pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a raw-text start tag: (tag name, content start offset).
    pending_raw: Option<(&'a str, usize)>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending_raw: None,
        }
    }

    fn scan_comment(&mut self) -> Result<Token<'a>, ScanError> {
        let start = self.pos;
        match self.input[start + 4..].find("-->") {
            Some(idx) => {
                let end = start + 4 + idx + 3;
                self.pos = end;
                Ok(Token::Comment(&self.input[start..end]))
            }
            None => Err(ScanError::UnterminatedComment(start)),
        }
    }

    /// Scan `<!...>` / `<?...>` / bogus `</...>` to the closing `>`,
    /// skipping quoted spans.
    fn scan_decl(&mut self) -> Result<Token<'a>, ScanError> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'>' => {
                    self.pos = i + 1;
                    return Ok(Token::Decl(&self.input[start..i + 1]));
                }
                q @ (b'"' | b'\'') => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != q {
                        i += 1;
                    }
                    if i >= bytes.len() {
                        return Err(ScanError::UnterminatedTag(start));
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Err(ScanError::UnterminatedTag(start))
    }

    fn scan_tag(&mut self, is_end: bool) -> Result<Token<'a>, ScanError> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let name_start = start + if is_end { 2 } else { 1 };
        let mut i = name_start;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &self.input[name_start..i];

        while i < bytes.len() {
            match bytes[i] {
                b'>' => {
                    let raw = &self.input[start..i + 1];
                    self.pos = i + 1;
                    return Ok(self.finish_tag(name, raw, is_end, false));
                }
                b'/' if !is_end && i + 1 < bytes.len() && bytes[i + 1] == b'>' => {
                    let raw = &self.input[start..i + 2];
                    self.pos = i + 2;
                    return Ok(self.finish_tag(name, raw, is_end, true));
                }
                q @ (b'"' | b'\'') => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != q {
                        i += 1;
                    }
                    if i >= bytes.len() {
                        return Err(ScanError::UnterminatedTag(start));
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Err(ScanError::UnterminatedTag(start))
    }

    fn finish_tag(&mut self, name: &'a str, raw: &'a str, is_end: bool, self_closing: bool) -> Token<'a> {
        if is_end {
            return Token::End { name, raw };
        }
        if is_raw_text(name) && !self_closing {
            self.pending_raw = Some((name, self.pos));
        }
        Token::Start {
            name,
            raw,
            self_closing,
        }
    }

    /// Scan raw-text content up to (not including) the matching end tag.
    fn scan_raw(&mut self, tag: &'a str, content_start: usize) -> Result<Token<'a>, ScanError> {
        let bytes = self.input.as_bytes();
        let mut i = content_start;
        let limit = bytes.len().saturating_sub(2 + tag.len());
        while i <= limit {
            // Compare bytewise: an index computed from the tag length may not
            // land on a char boundary when the content holds multibyte text.
            if bytes[i] == b'<'
                && bytes[i + 1] == b'/'
                && bytes[i + 2..i + 2 + tag.len()].eq_ignore_ascii_case(tag.as_bytes())
                && matches!(
                    bytes.get(i + 2 + tag.len()).copied(),
                    Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
                )
            {
                self.pos = i;
                return Ok(Token::Raw(&self.input[content_start..i]));
            }
            i += 1;
        }
        Err(ScanError::UnterminatedRawText {
            tag: tag.to_ascii_lowercase(),
            pos: content_start,
        })
    }

    fn scan_text(&mut self) -> Token<'a> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut i = start;
        loop {
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            if i >= bytes.len() || starts_construct(bytes, i) {
                break;
            }
            i += 1;
        }
        self.pos = i;
        Token::Text(&self.input[start..i])
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((tag, content_start)) = self.pending_raw.take() {
            return Some(self.scan_raw(tag, content_start));
        }
        if self.pos >= self.input.len() {
            return None;
        }
        let bytes = self.input.as_bytes();
        if bytes[self.pos] == b'<' && starts_construct(bytes, self.pos) {
            let rest = &self.input[self.pos..];
            let token = if rest.starts_with("<!--") {
                self.scan_comment()
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.scan_decl()
            } else if rest.starts_with("</") {
                if bytes
                    .get(self.pos + 2)
                    .is_some_and(|b| b.is_ascii_alphabetic())
                {
                    self.scan_tag(true)
                } else {
                    // Bogus construct like `</ >`; swallow to the next `>`.
                    self.scan_decl()
                }
            } else {
                self.scan_tag(false)
            };
            return Some(token);
        }
        Some(Ok(self.scan_text()))
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Whether the `<` at `i` begins a tag, comment, or declaration rather than
/// literal text.
fn starts_construct(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i + 1).copied() {
        Some(b) => b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Scanner::new(input).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn test_simple_element() {
        let toks = tokens("<p class=\"a\">hi</p>");
        assert_eq!(
            toks,
            vec![
                Token::Start {
                    name: "p",
                    raw: "<p class=\"a\">",
                    self_closing: false
                },
                Token::Text("hi"),
                Token::End {
                    name: "p",
                    raw: "</p>"
                },
            ]
        );
    }

    #[test]
    fn test_comment_and_doctype() {
        let toks = tokens("<!DOCTYPE html><!-- note -->text");
        assert_eq!(
            toks,
            vec![
                Token::Decl("<!DOCTYPE html>"),
                Token::Comment("<!-- note -->"),
                Token::Text("text"),
            ]
        );
    }

    #[test]
    fn test_gt_inside_quoted_attribute() {
        let toks = tokens("<a title=\"x > y\">z</a>");
        assert_eq!(
            toks[0],
            Token::Start {
                name: "a",
                raw: "<a title=\"x > y\">",
                self_closing: false
            }
        );
    }

    #[test]
    fn test_raw_text_content_not_parsed() {
        let toks = tokens("<script>if (a < b) { run(\"</div>\"); }</script>");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[1], Token::Raw("if (a < b) { run(\"</div>\"); }"));
        assert_eq!(
            toks[2],
            Token::End {
                name: "script",
                raw: "</script>"
            }
        );
    }

    #[test]
    fn test_raw_text_close_is_case_insensitive() {
        let toks = tokens("<SCRIPT>x</Script>");
        assert_eq!(toks[1], Token::Raw("x"));
    }

    #[test]
    fn test_empty_raw_text_element() {
        let toks = tokens("<script></script>");
        assert_eq!(toks[1], Token::Raw(""));
    }

    #[test]
    fn test_raw_text_multibyte_content() {
        let toks = tokens("<script>x</\u{1f600}\u{1f600}</script>");
        assert_eq!(toks[1], Token::Raw("x</\u{1f600}\u{1f600}"));
    }

    #[test]
    fn test_script_close_prefix_does_not_terminate() {
        let toks = tokens("<script>a</scripts>b</script>");
        assert_eq!(toks[1], Token::Raw("a</scripts>b"));
    }

    #[test]
    fn test_literal_lt_is_text() {
        let toks = tokens("<p>1 < 2</p>");
        assert_eq!(toks[1], Token::Text("1 < 2"));
    }

    #[test]
    fn test_self_closing_tag() {
        let toks = tokens("<br/>");
        assert_eq!(
            toks[0],
            Token::Start {
                name: "br",
                raw: "<br/>",
                self_closing: true
            }
        );
    }

    #[test]
    fn test_unterminated_comment_errors() {
        let err = Scanner::new("<!-- never closed")
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedComment(0)));
    }

    #[test]
    fn test_unterminated_quote_errors() {
        let err = Scanner::new("<a href=\"oops>").next().unwrap().unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedTag(0)));
    }

    #[test]
    fn test_unterminated_script_errors() {
        let mut scanner = Scanner::new("<script>var x = 1;");
        let first = scanner.next().unwrap().unwrap();
        assert!(matches!(first, Token::Start { name: "script", .. }));
        let err = scanner.next().unwrap().unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedRawText { .. }));
    }

    #[test]
    fn test_tokens_cover_input_exactly() {
        let input = "<!DOCTYPE html><div id=\"a\">x<!--c--><br/></div>";
        let rebuilt: String = tokens(input).iter().map(|t| t.raw()).collect();
        assert_eq!(rebuilt, input);
    }
}
