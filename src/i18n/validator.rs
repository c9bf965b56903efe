//! Translation key validation.
//!
//! Keys that could not survive a write/read cycle through the properties
//! codec are errors. Keys that survive but break the naming convention
//! (lowercase, digits and dots, e.g. `error.user.not.found`) are warnings.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the key unusable
    pub errors: Vec<String>,

    /// Convention violations that are tolerated
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation keys.
pub struct KeyValidator;

static CONVENTION_REGEX: OnceLock<Regex> = OnceLock::new();

impl KeyValidator {
    /// Validate a translation key.
    pub fn validate(key: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if key.is_empty() {
            report.errors.push("Key must not be empty".to_string());
            return report;
        }
        if key.contains('=') {
            report.errors.push(format!("Key '{}' must not contain '='", key));
        }
        if key.starts_with('#') {
            report
                .errors
                .push(format!("Key '{}' must not start with '#'", key));
        }
        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            report.errors.push(format!(
                "Key '{}' must not contain whitespace or control characters",
                key.escape_debug()
            ));
        }
        if report.has_errors() {
            return report;
        }

        let regex = CONVENTION_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9_-]+(\.[a-z0-9_-]+)*$").unwrap());
        if !regex.is_match(key) {
            report.warnings.push(format!(
                "Key '{}' does not follow the dot-separated lowercase convention (e.g. label.save)",
                key
            ));
        }

        report
    }
}
