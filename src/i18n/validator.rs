//! Locale consistency validation.
//!
//! Checks a locale's collections for broken aliases and untranslated
//! entries, and, given its parent locale, for missing keys and for
//! `{placeholder}` tokens that do not match the parent's value.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::i18n::{Locale, StringCollection};

/// Validation report containing errors and warnings about a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make lookups fail
    pub errors: Vec<String>,

    /// Entries that load and resolve but probably need attention
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
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for locale resources.
pub struct LocaleValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl LocaleValidator {
    /// Validate `locale`, comparing against `parent` when given.
    ///
    /// Errors:
    /// - an alias whose target is missing or is itself an alias
    ///
    /// Warnings:
    /// - an entry that is neither an alias nor derived and has an empty value
    /// - a parent entry with no counterpart in `locale`
    /// - `{placeholder}` tokens that differ from the parent's value
    pub fn validate(locale: &Locale, parent: Option<&Locale>) -> ValidationReport {
        let mut report = ValidationReport::new();

        for collection in locale.collections() {
            Self::check_entries(collection, &mut report);
        }

        if let Some(parent) = parent {
            for parent_collection in parent.collections() {
                Self::compare_with_parent(
                    locale.collection(parent_collection.key()),
                    parent_collection,
                    parent.key(),
                    &mut report,
                );
            }
        }

        report
    }

    fn check_entries(collection: &StringCollection, report: &mut ValidationReport) {
        for translation in collection.iter() {
            let path = format!("{}/{}", collection.key(), translation.key());

            if translation.is_aliased() {
                match collection.get(translation.clone_of()) {
                    None => report.errors.push(format!(
                        "Dangling alias: {} is a clone of missing '{}'",
                        path,
                        translation.clone_of()
                    )),
                    Some(target) if target.is_aliased() => report.errors.push(format!(
                        "Alias chain: {} is a clone of '{}', which is itself a clone",
                        path,
                        translation.clone_of()
                    )),
                    Some(_) => {}
                }
            } else if !translation.derive_from_parent() && translation.value().is_empty() {
                report.warnings.push(format!("Empty value: {}", path));
            }
        }
    }

    fn compare_with_parent(
        collection: Option<&StringCollection>,
        parent_collection: &StringCollection,
        parent_key: &str,
        report: &mut ValidationReport,
    ) {
        for parent_translation in parent_collection.iter() {
            let key = parent_translation.key();
            let path = format!("{}/{}", parent_collection.key(), key);

            let Some(collection) = collection.filter(|c| c.contains_key(key)) else {
                report.warnings.push(format!(
                    "Missing translation: {} exists in parent locale '{}'",
                    path, parent_key
                ));
                continue;
            };

            if collection.get(key).is_some_and(|t| t.derive_from_parent()) {
                continue;
            }

            // Broken aliases on either side are reported by check_entries.
            let (Ok(parent_value), Ok(value)) = (parent_collection.resolve(key), collection.resolve(key))
            else {
                continue;
            };

            let expected = Self::extract_placeholders(parent_value);
            let found = Self::extract_placeholders(value);
            if expected != found {
                report.warnings.push(format!(
                    "Placeholder mismatch: {} has {:?}, parent locale has {:?}",
                    path, found, expected
                ));
            }
        }
    }

    /// Extract the distinct `{name}` placeholders from text
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
        });

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(0).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::StringTranslation;

    fn locale_with(key: &str, entries: Vec<StringTranslation>) -> Locale {
        let mut collection = StringCollection::new("common");
        collection.set_all(entries);

        let mut locale = Locale::new(key);
        locale.set_name(key);
        locale.insert_collection(collection);
        locale
    }

    fn alias(key: &str, target: &str) -> StringTranslation {
        let mut translation = StringTranslation::new(key, "");
        translation.set_clone_of(target);
        translation
    }

    fn derived(key: &str) -> StringTranslation {
        let mut translation = StringTranslation::new(key, "");
        translation.set_derive_from_parent(true);
        translation
    }

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders_multiple() {
        let placeholders = LocaleValidator::extract_placeholders("{count} files in {folder}");
        let expected: BTreeSet<String> = ["{count}", "{folder}"].iter().map(|s| s.to_string()).collect();
        assert_eq!(placeholders, expected);
    }

    #[test]
    fn test_extract_placeholders_order_insensitive() {
        assert_eq!(
            LocaleValidator::extract_placeholders("{a} then {b}"),
            LocaleValidator::extract_placeholders("{b} vor {a}")
        );
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(LocaleValidator::extract_placeholders("No tokens { here }").is_empty());
    }

    // ==================== Entry Check Tests ====================

    #[test]
    fn test_validate_clean_locale() {
        let locale = locale_with(
            "en",
            vec![StringTranslation::new("ok", "OK"), alias("okay", "ok")],
        );

        let report = LocaleValidator::validate(&locale, None);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn test_validate_dangling_alias() {
        let locale = locale_with("en", vec![alias("okay", "gone")]);

        let report = LocaleValidator::validate(&locale, None);
        assert!(report.has_errors());
        assert!(report.errors[0].contains("Dangling alias: common/okay"));
    }

    #[test]
    fn test_validate_alias_chain() {
        let locale = locale_with(
            "en",
            vec![
                StringTranslation::new("ok", "OK"),
                alias("okay", "ok"),
                alias("okey", "okay"),
            ],
        );

        let report = LocaleValidator::validate(&locale, None);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Alias chain: common/okey"));
    }

    #[test]
    fn test_validate_empty_value() {
        let locale = locale_with(
            "en",
            vec![StringTranslation::new("ok", ""), derived("cancel")],
        );

        let report = LocaleValidator::validate(&locale, None);
        assert!(!report.has_errors());
        assert_eq!(report.warnings, vec!["Empty value: common/ok".to_string()]);
    }

    // ==================== Parent Comparison Tests ====================

    #[test]
    fn test_validate_missing_translation() {
        let parent = locale_with(
            "en",
            vec![StringTranslation::new("ok", "OK"), StringTranslation::new("cancel", "Cancel")],
        );
        let locale = locale_with("de", vec![StringTranslation::new("ok", "OK")]);

        let report = LocaleValidator::validate(&locale, Some(&parent));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Missing translation: common/cancel"));
        assert!(report.warnings[0].contains("'en'"));
    }

    #[test]
    fn test_validate_missing_collection() {
        let parent = locale_with("en", vec![StringTranslation::new("ok", "OK")]);
        let locale = Locale::new("de");

        let report = LocaleValidator::validate(&locale, Some(&parent));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Missing translation: common/ok"));
    }

    #[test]
    fn test_validate_placeholder_mismatch() {
        let parent = locale_with("en", vec![StringTranslation::new("files", "{count} files")]);
        let locale = locale_with("de", vec![StringTranslation::new("files", "{anzahl} Dateien")]);

        let report = LocaleValidator::validate(&locale, Some(&parent));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Placeholder mismatch: common/files"));
    }

    #[test]
    fn test_validate_placeholders_match() {
        let parent = locale_with("en", vec![StringTranslation::new("files", "{count} files")]);
        let locale = locale_with("de", vec![StringTranslation::new("files", "{count} Dateien")]);

        let report = LocaleValidator::validate(&locale, Some(&parent));
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_derived_entry_skips_comparison() {
        let parent = locale_with("en", vec![StringTranslation::new("files", "{count} files")]);
        let locale = locale_with("de", vec![derived("files")]);

        let report = LocaleValidator::validate(&locale, Some(&parent));
        assert!(report.is_clean());
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_validation_report_with_error() {
        let mut report = ValidationReport::new();
        report.errors.push("Test error".to_string());

        assert!(!report.is_clean());
        assert!(report.has_errors());
        assert!(!report.has_warnings());
    }
}
