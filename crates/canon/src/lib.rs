// ABOUTME: Main library entry point for the sitecmp HTML canonicalization engine.
// ABOUTME: Re-exports the public API: canonicalize, Canonicalizer, CanonOptions, CleaningConfig, CanonError.

//! sitecmp-canon - HTML canonicalization for line-based comparison.
//!
//! This crate turns a raw HTML string plus a declarative cleaning
//! configuration into a normalized textual representation, so that two
//! documents differing only in surface noise (comments, attribute order,
//! whitespace, CMS wrapper markup targeted by rules) canonicalize to
//! identical text.
//!
//! # Example
//!
//! ```
//! use sitecmp_canon::{canonicalize, CanonOptions, CleaningConfig};
//!
//! # fn main() -> Result<(), sitecmp_canon::CanonError> {
//! let config = CleaningConfig::from_json(
//!     r#"{"elements": [{"selector": "script", "remove": true}]}"#,
//! )?;
//! let options = CanonOptions::new().with_config(config);
//! let text = canonicalize("<body><p>hi</p><script>track()</script></body>", &options)?;
//! assert!(!text.contains("track()"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod matcher;
pub mod options;
pub mod pipeline;
mod selector;
pub mod text;

pub use crate::config::{AttributeAction, AttributeRule, CleaningConfig, ElementAction, ElementRule};
pub use crate::error::{CanonError, ErrorCode};
pub use crate::options::CanonOptions;
pub use crate::pipeline::{canonicalize, Canonicalizer};
