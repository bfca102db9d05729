// ABOUTME: Options controlling one canonicalization: cleaning config, head reorder, recovery.
// ABOUTME: Plain data with fluent setters; defaults match the engine's conservative behavior.

use crate::config::CleaningConfig;

/// Configuration for a canonicalization run.
///
/// The defaults are deliberately strict: no cleaning rules, no head
/// reordering, and no tolerant-parse recovery — malformed markup in a
/// document under test is a finding, not something to paper over.
#[derive(Debug, Clone, Default)]
pub struct CanonOptions {
    /// Reorder `<head>` children into canonical category order.
    pub reorder_head: bool,
    /// On a minify failure, reparse the raw input tolerantly and retry.
    pub recover: bool,
    /// The cleaning rules to apply between parse and serialization.
    pub config: CleaningConfig,
}

impl CanonOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable head-child reordering.
    pub fn with_reorder_head(mut self, reorder: bool) -> Self {
        self.reorder_head = reorder;
        self
    }

    /// Enable or disable tolerant-parse recovery on minify failure.
    pub fn with_recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Set the cleaning configuration.
    pub fn with_config(mut self, config: CleaningConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_off_and_empty() {
        let opts = CanonOptions::new();
        assert!(!opts.reorder_head);
        assert!(!opts.recover);
        assert!(opts.config.is_empty());
    }

    #[test]
    fn test_fluent_setters() {
        let config = CleaningConfig::from_json(r#"{"elements":[{"selector":"script"}]}"#).unwrap();
        let opts = CanonOptions::new()
            .with_reorder_head(true)
            .with_recover(true)
            .with_config(config);
        assert!(opts.reorder_head);
        assert!(opts.recover);
        assert_eq!(opts.config.elements.len(), 1);
    }
}
