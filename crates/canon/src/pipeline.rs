// ABOUTME: The fixed-sequence canonicalization pipeline and the reusable Canonicalizer handle.
// ABOUTME: Minify, parse, prune, canonicalize order, re-minify, pretty-print, flatten.

//! The canonicalization pipeline.
//!
//! The stage order is load-bearing: minification must precede the parse so
//! pruning rules match against compact markup; the re-minify after the DOM
//! passes keeps comments because emptied elements carry their replacement as
//! a comment child; pretty-printing fixes the line structure; and the final
//! de-indent flattens the one artifact (indentation) that would still cause
//! spurious line diffs.

use dom_query::Document;

use crate::dom::{order, prune};
use crate::error::CanonError;
use crate::options::CanonOptions;
use crate::selector;
use crate::text::{minify, pretty};

/// Canonicalize a raw HTML document into comparison-ready text.
///
/// Fails when the input cannot be minified (unless `recover` is enabled) or
/// when a cleaning rule carries an invalid selector. Invalid regex filters
/// inside rules degrade to warnings instead.
pub fn canonicalize(html: &str, options: &CanonOptions) -> Result<String, CanonError> {
    let minified = match minify::minify(html) {
        Ok(minified) => minified,
        Err(err) if options.recover => {
            tracing::warn!("minify failed ({}); retrying via tolerant reparse", err);
            minify::minify(&reserialize(html))?
        }
        Err(err) => return Err(err),
    };

    let doc = Document::from(minified);
    prune::apply_element_rules(&doc, &options.config.elements)?;
    prune::apply_attribute_rules(&doc, &options.config.attributes)?;
    if options.reorder_head {
        order::reorder_head(&doc);
    }
    order::sort_attributes(&doc);

    let reminified = minify::minify_keep_comments(&doc.html())?;
    let printed = pretty::pretty(&reminified)?;
    Ok(pretty::flatten_indent(&printed))
}

/// Recovery path: parse the raw string tolerantly and serialize the root
/// element's markup. The tolerant parser closes what the author left open.
fn reserialize(html: &str) -> String {
    let doc = Document::from(html);
    let root = doc.select("html");
    if root.is_empty() {
        doc.html().to_string()
    } else {
        root.html().to_string()
    }
}

/// A reusable canonicalization handle.
///
/// Holds the options for a whole comparison run and pre-compiles every rule
/// selector into the process-wide cache, so per-document work skips selector
/// parsing. Cheap to share behind an `Arc` across worker threads.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    options: CanonOptions,
}

impl Canonicalizer {
    /// Create a canonicalizer, warming the selector cache for its rules.
    pub fn new(options: CanonOptions) -> Self {
        selector::warm(options.config.selectors());
        Self { options }
    }

    /// Canonicalize one document with this handle's options.
    pub fn canonicalize(&self, html: &str) -> Result<String, CanonError> {
        canonicalize(html, &self.options)
    }

    /// The options this handle was built with.
    pub fn options(&self) -> &CanonOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleaningConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_document_flattens() {
        let out = canonicalize(
            "<html><head></head><body><div><p>a</p></div></body></html>",
            &CanonOptions::new(),
        )
        .unwrap();
        assert_eq!(
            out,
            "<html>\n<head></head>\n<body>\n<div>\n<p>a</p>\n</div>\n</body>\n</html>"
        );
    }

    #[test]
    fn test_comments_in_input_are_stripped() {
        let out = canonicalize(
            "<body><!-- injected by CMS --><p>a</p></body>",
            &CanonOptions::new(),
        )
        .unwrap();
        assert!(!out.contains("injected"), "got: {}", out);
    }

    #[test]
    fn test_replacement_comment_survives_reminify() {
        let config =
            CleaningConfig::from_json(r#"{"elements":[{"selector":"script","replacement":"js"}]}"#)
                .unwrap();
        let out = canonicalize(
            "<body><script>x()</script></body>",
            &CanonOptions::new().with_config(config),
        )
        .unwrap();
        assert!(out.contains("<!-- js -->"), "got: {}", out);
    }

    #[test]
    fn test_minify_failure_is_fatal_without_recover() {
        let err = canonicalize("<p>a</p><!-- oops", &CanonOptions::new()).unwrap_err();
        assert!(err.is_minify());
    }

    #[test]
    fn test_recover_reserializes_tolerantly() {
        let out = canonicalize(
            "<p>a</p><!-- oops",
            &CanonOptions::new().with_recover(true),
        )
        .unwrap();
        assert!(out.contains("<p>a</p>"), "got: {}", out);
    }

    #[test]
    fn test_canonicalizer_matches_free_function() {
        let options = CanonOptions::new();
        let html = "<body><p>x</p></body>";
        let handle = Canonicalizer::new(options.clone());
        assert_eq!(
            handle.canonicalize(html).unwrap(),
            canonicalize(html, &options).unwrap()
        );
    }
}
