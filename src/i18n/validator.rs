//! Dictionary quality validation.
//!
//! Compares a translated dictionary against a reference one (usually the
//! fallback language) and reports keys that are missing or extra, and
//! templates whose placeholders drifted during translation.

use crate::i18n::translator::{placeholder_regex, Dictionary};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break translation at runtime
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for dictionary completeness and template consistency.
pub struct DictionaryValidator;

static DIRECTIVE_REGEX: OnceLock<Regex> = OnceLock::new();

impl DictionaryValidator {
    /// Validate `translated` against `reference`.
    ///
    /// - keys missing from `translated` are errors
    /// - a different number of positional directives is an error, since
    ///   formatting the translation with the reference's arguments fails
    /// - keys only present in `translated` and differing `{name}`
    ///   placeholder sets are warnings
    ///
    /// Findings are ordered by key.
    pub fn validate(reference: &Dictionary, translated: &Dictionary) -> ValidationReport {
        let mut report = ValidationReport::new();

        let reference_keys: BTreeSet<&String> = reference.keys().collect();
        let translated_keys: BTreeSet<&String> = translated.keys().collect();

        for key in reference_keys.difference(&translated_keys) {
            report.errors.push(format!("Missing key '{}'", key));
        }
        for key in translated_keys.difference(&reference_keys) {
            report
                .warnings
                .push(format!("Extra key '{}' not present in reference", key));
        }
        for key in reference_keys.intersection(&translated_keys) {
            report.merge(Self::validate_template(
                key,
                &reference[*key],
                &translated[*key],
            ));
        }

        report
    }

    /// Validate a single translated template against its reference.
    pub fn validate_template(key: &str, original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let orig_placeholders = Self::extract_placeholders(original);
        let trans_placeholders = Self::extract_placeholders(translated);
        if orig_placeholders != trans_placeholders {
            report.warnings.push(format!(
                "Placeholder mismatch for '{}': reference has {:?}, translation has {:?}",
                key, orig_placeholders, trans_placeholders
            ));
        }

        let orig_directives = Self::count_directives(original);
        let trans_directives = Self::count_directives(translated);
        if orig_directives != trans_directives {
            report.errors.push(format!(
                "Format directive count mismatch for '{}': reference has {}, translation has {}",
                key, orig_directives, trans_directives
            ));
        }

        report
    }

    /// Extract the distinct `{name}` placeholder names from a template
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        placeholder_regex()
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Count printf-style directives, ignoring `%%` escapes
    fn count_directives(text: &str) -> usize {
        let regex = DIRECTIVE_REGEX.get_or_init(|| {
            Regex::new(r"%%|%(?:\d+\$)?(?:[-+ 0]|'.)*\d*(?:\.\d*)?[sduFfeExXobc]").unwrap()
        });

        regex
            .find_iter(text)
            .filter(|m| m.as_str() != "%%")
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(entries: &[(&str, &str)]) -> Dictionary {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== Extraction Tests ====================

    #[test]
    fn test_extract_placeholders() {
        let placeholders = DictionaryValidator::extract_placeholders("Hi {name}, see {url} {name}");
        assert_eq!(
            placeholders.into_iter().collect::<Vec<_>>(),
            vec!["name", "url"]
        );
    }

    #[test]
    fn test_extract_placeholders_agrees_with_substitution() {
        // Any name the translator substitutes is a placeholder here too
        let template = "{user name} owes {€} ({a-b})";
        let placeholders = DictionaryValidator::extract_placeholders(template);
        assert_eq!(
            placeholders.into_iter().collect::<Vec<_>>(),
            vec!["a-b", "user name", "€"]
        );

        let mut translator = crate::i18n::Translator::new();
        translator.set_translates(dictionary(&[("k", template)]));
        let args = crate::i18n::Args::named([("user name", "Ann"), ("€", "5"), ("a-b", "x")]);
        assert_eq!(translator.translate("k", Some(&args)).unwrap(), "Ann owes 5 (x)");
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(DictionaryValidator::extract_placeholders("No placeholders").is_empty());
    }

    #[test]
    fn test_count_directives() {
        assert_eq!(DictionaryValidator::count_directives("%d items"), 1);
        assert_eq!(DictionaryValidator::count_directives("%s has %05.2f"), 2);
        assert_eq!(DictionaryValidator::count_directives("%2$s %1$s"), 2);
        assert_eq!(DictionaryValidator::count_directives("%'*10s"), 1);
    }

    #[test]
    fn test_count_directives_ignores_escapes() {
        assert_eq!(DictionaryValidator::count_directives("100%% sure"), 0);
        assert_eq!(DictionaryValidator::count_directives("%d%%"), 1);
    }

    // ==================== Template Validation Tests ====================

    #[test]
    fn test_validate_template_clean() {
        let report =
            DictionaryValidator::validate_template("k", "Hello {name}, %d new", "Ahoj {name}, %d nové");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_template_placeholder_mismatch() {
        let report = DictionaryValidator::validate_template("k", "Hello {name}", "Ahoj {jmeno}");
        assert!(report.has_warnings());
        assert!(!report.has_errors());
        assert!(report.warnings[0].contains("Placeholder mismatch for 'k'"));
    }

    #[test]
    fn test_validate_template_directive_mismatch() {
        let report = DictionaryValidator::validate_template("count", "%d items", "položky");
        assert!(report.has_errors());
        assert!(report.errors[0].contains("Format directive count mismatch for 'count'"));
    }

    // ==================== Dictionary Validation Tests ====================

    #[test]
    fn test_validate_complete_translation() {
        let reference = dictionary(&[("a", "Hello {name}"), ("b", "%d items")]);
        let translated = dictionary(&[("a", "Ahoj {name}"), ("b", "%d položek")]);

        assert!(DictionaryValidator::validate(&reference, &translated).is_clean());
    }

    #[test]
    fn test_validate_missing_keys_sorted() {
        let reference = dictionary(&[("z", "Z"), ("a", "A"), ("m", "M")]);
        let translated = dictionary(&[("m", "M")]);

        let report = DictionaryValidator::validate(&reference, &translated);
        assert_eq!(report.errors, vec!["Missing key 'a'", "Missing key 'z'"]);
    }

    #[test]
    fn test_validate_extra_key_warning() {
        let reference = dictionary(&[("a", "A")]);
        let translated = dictionary(&[("a", "A"), ("stale", "old")]);

        let report = DictionaryValidator::validate(&reference, &translated);
        assert!(!report.has_errors());
        assert_eq!(
            report.warnings,
            vec!["Extra key 'stale' not present in reference"]
        );
    }

    #[test]
    fn test_validate_collects_template_findings() {
        let reference = dictionary(&[("greet", "Hi {name}"), ("count", "%d")]);
        let translated = dictionary(&[("greet", "Ahoj"), ("count", "%d %s")]);

        let report = DictionaryValidator::validate(&reference, &translated);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_validation_report_with_warning() {
        let mut report = ValidationReport::new();
        report.warnings.push("Test warning".to_string());

        assert!(!report.is_clean());
        assert!(!report.has_errors());
        assert!(report.has_warnings());
    }
}
