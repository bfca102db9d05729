// ABOUTME: Error types for the canonicalization engine including ErrorCode enum and CanonError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of canonicalization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Minify,
    Selector,
    Config,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Minify => "minify failed",
            ErrorCode::Selector => "invalid selector",
            ErrorCode::Config => "invalid configuration",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for canonicalization operations.
///
/// `rule` carries the JSON form of the configuration rule that triggered the
/// failure, when one is involved, so callers can report which entry is broken.
#[derive(Debug, thiserror::Error)]
pub struct CanonError {
    pub code: ErrorCode,
    pub op: String,
    pub rule: Option<String>,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for CanonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "canon: {}: {}", self.op, self.code)?;
        if let Some(ref rule) = self.rule {
            write!(f, " in rule {}", rule)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl CanonError {
    /// Create a Minify error.
    pub fn minify(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Minify,
            op: op.into(),
            rule: None,
            source,
        }
    }

    /// Create a Selector error carrying the offending rule's serialized form.
    pub fn selector(
        op: impl Into<String>,
        rule: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Selector,
            op: op.into(),
            rule: Some(rule.into()),
            source,
        }
    }

    /// Create a Config error.
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Config,
            op: op.into(),
            rule: None,
            source,
        }
    }

    /// Returns true if this is a Minify error.
    pub fn is_minify(&self) -> bool {
        self.code == ErrorCode::Minify
    }

    /// Returns true if this is a Selector error.
    pub fn is_selector(&self) -> bool {
        self.code == ErrorCode::Selector
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_op_and_code() {
        let err = CanonError::minify("Canonicalize", None);
        assert_eq!(err.to_string(), "canon: Canonicalize: minify failed");
    }

    #[test]
    fn test_display_includes_rule_and_source() {
        let err = CanonError::selector(
            "ElementRules",
            r#"{"selector":"div[["}"#,
            Some(anyhow::anyhow!("parse failed")),
        );
        let s = err.to_string();
        assert!(s.contains("invalid selector"), "got: {}", s);
        assert!(s.contains(r#"{"selector":"div[["}"#), "got: {}", s);
        assert!(s.contains("parse failed"), "got: {}", s);
    }

    #[test]
    fn test_code_helpers() {
        assert!(CanonError::minify("x", None).is_minify());
        assert!(CanonError::selector("x", "{}", None).is_selector());
        assert!(CanonError::config("x", None).is_config());
        assert!(!CanonError::config("x", None).is_minify());
    }
}
