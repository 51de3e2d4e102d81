//! Eligibility roster configuration.

use regex::Regex;

/// Rules applied to external ids entering the eligibility roster.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Pattern a normalized external id must match to be imported.
    /// `None` accepts any non-empty id.
    pub external_id_pattern: Option<Regex>,
}

impl RegistryConfig {
    pub fn new(external_id_pattern: Option<Regex>) -> Self {
        Self {
            external_id_pattern,
        }
    }

    /// Whether a normalized external id may be imported.
    pub fn accepts(&self, external_id: &str) -> bool {
        if external_id.is_empty() {
            return false;
        }
        self.external_id_pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(external_id))
    }
}

/// Canonical form of an external id: surrounding whitespace removed,
/// upper-cased.
pub fn normalize_external_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_external_id() {
        assert_eq!(normalize_external_id("  ug22ict0042 "), "UG22ICT0042");
        assert_eq!(normalize_external_id(""), "");
    }

    #[test]
    fn test_accepts_with_pattern() {
        let config = RegistryConfig::new(Some(Regex::new(r"^UG(20|22)ICT\d{4}$").unwrap()));
        assert!(config.accepts("UG22ICT0042"));
        assert!(config.accepts("UG20ICT9999"));
        assert!(!config.accepts("UG21ICT0042"));
        assert!(!config.accepts("UG22ICT042"));
        assert!(!config.accepts(""));
    }

    #[test]
    fn test_accepts_without_pattern() {
        let config = RegistryConfig::default();
        assert!(config.accepts("anything"));
        assert!(!config.accepts(""));
    }
}
