// ABOUTME: Process-wide cache of compiled CSS selectors used by cleaning rules.
// ABOUTME: Invalid selectors cache as None so pruners can surface them as fatal rule errors.

//! Selector compilation and caching.
//!
//! Rule selectors are compiled once per process and reused across documents;
//! a comparison run applies the same configuration to every page, so the
//! same handful of selectors is looked up over and over. Invalid selectors
//! are cached too (as `None`) — the pruners turn that into a fatal error
//! naming the rule, and re-encountering the same broken selector must not
//! re-parse it.

use std::collections::HashMap;
use std::sync::RwLock;

use dom_query::Matcher;
use once_cell::sync::Lazy;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Matcher>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Matcher)` for a valid selector, `None` for an invalid one.
/// Safe to call from multiple threads; reads take a shared lock, misses take
/// an exclusive lock.
pub fn get_or_compile(css: &str) -> Option<Matcher> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Matcher::new(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Another thread may have inserted while we compiled.
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Compiles a batch of selectors into the cache under one lock acquisition.
///
/// Used when a configuration is loaded once and applied to many documents.
pub fn warm<'a>(selectors: impl IntoIterator<Item = &'a str>) {
    let mut cache = SELECTOR_CACHE.write().unwrap();
    for css in selectors {
        if !cache.contains_key(css) {
            let compiled = Matcher::new(css).ok();
            cache.insert(css.to_string(), compiled);
        }
    }
}
