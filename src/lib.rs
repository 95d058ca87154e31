//! Directory-based locale resource store.
//!
//! Loads a language's metadata and string collections from a folder of XML
//! resource files, answers lookups by collection and key, and writes the
//! same structure back to disk.

pub mod config;
pub mod document;
pub mod error;
pub mod i18n;

pub use error::{LocaleError, Result};
pub use i18n::{Locale, LocaleRegistry, StringCollection, StringTranslation};
