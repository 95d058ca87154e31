//! Error types for locale loading, lookup and persistence.

use std::path::PathBuf;

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, LocaleError>;

/// Errors raised by the locale store.
///
/// Filesystem-shape problems (a metadata file that does not exist, a path
/// without a folder) are not errors: `Locale::load` and `Locale::save`
/// report them by returning `Ok(false)`.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// A required metadata element is missing.
    #[error("incomplete locale: the required locale element '{element}' was not found")]
    IncompleteLocale { element: &'static str },

    #[error("locale '{locale}' not found")]
    LocaleNotFound { locale: String },

    #[error("string collection '{collection}' not found")]
    CollectionNotFound { collection: String },

    #[error("string '{key}' not found in collection '{collection}'")]
    KeyNotFound { collection: String, key: String },

    #[error("duplicate string key '{key}' in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    #[error("malformed entry in {}: {reason}", .path.display())]
    MalformedEntry { path: PathBuf, reason: String },

    /// An alias points at itself or at another alias.
    #[error("string '{key}' in collection '{collection}' is a clone of '{target}', which is itself a clone")]
    AliasChain {
        collection: String,
        key: String,
        target: String,
    },

    #[error("parent locale cycle detected at '{locale}'")]
    ParentCycle { locale: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LocaleError {
    /// True for failed locale, collection or key lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LocaleError::LocaleNotFound { .. }
                | LocaleError::CollectionNotFound { .. }
                | LocaleError::KeyNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let collection = LocaleError::CollectionNotFound {
            collection: "menu".to_string(),
        };
        let key = LocaleError::KeyNotFound {
            collection: "menu".to_string(),
            key: "open".to_string(),
        };
        let incomplete = LocaleError::IncompleteLocale { element: "name" };

        assert!(collection.is_not_found());
        assert!(key.is_not_found());
        assert!(!incomplete.is_not_found());
    }

    #[test]
    fn test_display_messages() {
        let err = LocaleError::IncompleteLocale { element: "locale" };
        assert_eq!(
            err.to_string(),
            "incomplete locale: the required locale element 'locale' was not found"
        );

        let err = LocaleError::KeyNotFound {
            collection: "common".to_string(),
            key: "ok".to_string(),
        };
        assert_eq!(err.to_string(), "string 'ok' not found in collection 'common'");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LocaleError = io.into();
        assert!(matches!(err, LocaleError::Io(_)));
    }
}
