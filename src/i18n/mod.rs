//! Locale resources: translations, collections and locales.
//!
//! A locale lives in one folder: a metadata file plus one resource file per
//! string collection. This module loads such folders, answers lookups and
//! writes them back.
//!
//! # Architecture
//!
//! - `translation`: A single key/value entry with alias and version metadata
//! - `collection`: A keyed set of translations persisted as one file
//! - `locale`: Locale metadata plus its collections; whole-folder load/save
//! - `registry`: Several loaded locales with parent-locale fallback
//! - `validator`: Alias, coverage and placeholder checks
//! - `metrics`: Load/save and lookup counters
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_store::i18n::Locale;
//!
//! let mut locale = Locale::new("de");
//! if locale.load(Path::new("locales/de/locale.xml"))? {
//!     let label = locale.get_string("common", "ok")?;
//! }
//! ```

mod collection;
mod locale;
mod metrics;
mod registry;
mod translation;
mod validator;

pub use collection::StringCollection;
pub use locale::Locale;
pub use metrics::{LocaleMetrics, MetricsReport};
pub use registry::LocaleRegistry;
pub use translation::StringTranslation;
pub use validator::{LocaleValidator, ValidationReport};
