// ABOUTME: Content filter for cleaning rules: literal substring and regex criteria.
// ABOUTME: Compiles JavaScript-style regex flags and fails open on invalid patterns.

//! Rule content matching.
//!
//! A rule may constrain its targets by a literal substring (`contains`), a
//! regex (`containsRegex` + `containsRegexFlags`), or both; both criteria
//! must pass when both are present. With no criteria every candidate
//! matches.
//!
//! The flag string uses the JavaScript regex alphabet. `i`/`m`/`s` become
//! inline flags; `d`/`g`/`u`/`v`/`y` change nothing about whether a match
//! exists and are ignored. An unknown flag character or a pattern the regex
//! engine rejects disables the regex criterion entirely (fails open) with a
//! warning, never aborting the pass.

use regex::Regex;

/// A compiled per-rule content filter.
///
/// Build one per rule before iterating its matched elements so the regex is
/// compiled once, not once per element.
#[derive(Debug)]
pub struct ContentFilter {
    contains: Option<String>,
    regex: Option<Regex>,
}

impl ContentFilter {
    /// Compile a filter from a rule's criteria fields.
    pub fn new(contains: Option<&str>, regex_source: Option<&str>, regex_flags: Option<&str>) -> Self {
        let regex = regex_source.and_then(|source| compile_pattern(source, regex_flags));
        Self {
            contains: contains.map(str::to_string),
            regex,
        }
    }

    /// True when the candidate text passes every active criterion.
    pub fn matches(&self, candidate: &str) -> bool {
        if let Some(ref needle) = self.contains {
            if !candidate.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(ref re) = self.regex {
            if !re.is_match(candidate) {
                return false;
            }
        }
        true
    }
}

/// Compile a pattern with translated flags, or None (with a warning) when
/// the flags or the pattern are invalid.
fn compile_pattern(source: &str, flags: Option<&str>) -> Option<Regex> {
    let inline = match flags {
        Some(f) => match translate_flags(f) {
            Some(inline) => inline,
            None => {
                tracing::warn!("invalid regex flags {f:?} for pattern {source:?}; filter disabled");
                return None;
            }
        },
        None => String::new(),
    };
    let pattern = if inline.is_empty() {
        source.to_string()
    } else {
        format!("(?{}){}", inline, source)
    };
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("invalid regex {source:?}: {e}; filter disabled");
            None
        }
    }
}

/// Map a JavaScript flag string to regex inline flags.
///
/// Returns None when the string contains a character outside the JavaScript
/// flag alphabet.
fn translate_flags(flags: &str) -> Option<String> {
    let mut inline = String::new();
    for ch in flags.chars() {
        match ch {
            'i' | 'm' | 's' => {
                if !inline.contains(ch) {
                    inline.push(ch);
                }
            }
            'd' | 'g' | 'u' | 'v' | 'y' => {}
            _ => return None,
        }
    }
    Some(inline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_criteria_matches_everything() {
        let filter = ContentFilter::new(None, None, None);
        assert!(filter.matches("anything"));
        assert!(filter.matches(""));
    }

    #[test]
    fn test_contains_is_literal() {
        let filter = ContentFilter::new(Some("a.b"), None, None);
        assert!(filter.matches("xx a.b yy"));
        assert!(!filter.matches("aXb"), "dot must not act as a wildcard");
    }

    #[test]
    fn test_regex_matches_anywhere() {
        let filter = ContentFilter::new(None, Some(r"bar\d"), None);
        assert!(filter.matches("foo bar7 baz"));
        assert!(!filter.matches("bar baz"));
    }

    #[test]
    fn test_both_criteria_are_anded() {
        let filter = ContentFilter::new(Some("foo"), Some(r"bar\d"), None);
        assert!(filter.matches("foo bar1"));
        assert!(!filter.matches("foo bar"));
        assert!(!filter.matches("bar1"));
    }

    #[test]
    fn test_case_insensitive_flag() {
        let filter = ContentFilter::new(None, Some("tracker"), Some("i"));
        assert!(filter.matches("TRACKER.js"));
    }

    #[test]
    fn test_irrelevant_js_flags_ignored() {
        let filter = ContentFilter::new(None, Some("x"), Some("gi"));
        assert!(filter.matches("X"));
        assert!(!filter.matches("y"));
    }

    #[test]
    fn test_dotall_flag() {
        let filter = ContentFilter::new(None, Some("a.b"), Some("s"));
        assert!(filter.matches("a\nb"));
    }

    #[test]
    fn test_invalid_pattern_fails_open() {
        let filter = ContentFilter::new(None, Some("("), None);
        assert!(filter.matches("anything at all"));
    }

    #[test]
    fn test_invalid_flag_fails_open() {
        let filter = ContentFilter::new(None, Some("x"), Some("q"));
        assert!(filter.matches("no x here"));
    }

    #[test]
    fn test_invalid_pattern_keeps_contains_criterion() {
        let filter = ContentFilter::new(Some("foo"), Some("("), None);
        assert!(filter.matches("foo"));
        assert!(!filter.matches("bar"));
    }

    #[test]
    fn test_translate_flags() {
        assert_eq!(translate_flags("").as_deref(), Some(""));
        assert_eq!(translate_flags("ims").as_deref(), Some("ims"));
        assert_eq!(translate_flags("gi").as_deref(), Some("i"));
        assert_eq!(translate_flags("ii").as_deref(), Some("i"));
        assert_eq!(translate_flags("q"), None);
    }
}
