//! A language's metadata and all of its string collections.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::document::{self, Element};
use crate::error::{LocaleError, Result};
use crate::i18n::collection::collection_key_for;
use crate::i18n::{LocaleMetrics, StringCollection};

/// One language's resource set, stored as a folder of resource files.
///
/// The folder holds one metadata file (display name, writing direction,
/// parent locale) and any number of sibling collection files sharing its
/// extension, each named after its collection key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    key: String,
    name: String,
    right_to_left: bool,
    parent_locale: String,
    collections: BTreeMap<String, StringCollection>,
}

impl Locale {
    /// Create an empty left-to-right locale with no parent.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: String::new(),
            right_to_left: false,
            parent_locale: String::new(),
            collections: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        self.right_to_left = right_to_left;
    }

    /// Key of the fallback locale, or an empty string.
    pub fn parent_locale(&self) -> &str {
        &self.parent_locale
    }

    pub fn set_parent_locale(&mut self, parent: impl Into<String>) {
        self.parent_locale = parent.into();
    }

    pub fn has_parent(&self) -> bool {
        !self.parent_locale.is_empty()
    }

    /// Collections in ascending key order.
    pub fn collections(&self) -> impl Iterator<Item = &StringCollection> {
        self.collections.values()
    }

    pub fn collection(&self, key: &str) -> Option<&StringCollection> {
        self.collections.get(key)
    }

    pub fn collection_mut(&mut self, key: &str) -> Option<&mut StringCollection> {
        self.collections.get_mut(key)
    }

    /// Insert a collection under its own key, returning any collection it replaced.
    pub fn insert_collection(&mut self, collection: StringCollection) -> Option<StringCollection> {
        self.collections
            .insert(collection.key().to_string(), collection)
    }

    pub fn remove_collection(&mut self, key: &str) -> Option<StringCollection> {
        self.collections.remove(key)
    }

    /// Replace every collection, re-indexing by each collection's own key.
    /// Later collections win when keys repeat.
    pub fn set_collections<I>(&mut self, collections: I)
    where
        I: IntoIterator<Item = StringCollection>,
    {
        self.collections.clear();
        for collection in collections {
            self.insert_collection(collection);
        }
    }

    /// The stored value of `key` in collection `collection_key`.
    ///
    /// There is no parent-locale fallback here; see
    /// [`LocaleRegistry::resolve`](super::LocaleRegistry::resolve).
    pub fn get_string(&self, collection_key: &str, key: &str) -> Result<&str> {
        let result = match self.collections.get(collection_key) {
            Some(collection) => collection.value(key),
            None => Err(LocaleError::CollectionNotFound {
                collection: collection_key.to_string(),
            }),
        };

        if result.is_err() {
            LocaleMetrics::global().record_lookup_miss();
        }
        result
    }

    /// Order locales by display name, e.g. for a locale picker.
    pub fn cmp_by_name(&self, other: &Locale) -> Ordering {
        self.name.cmp(&other.name)
    }

    pub fn sort_by_name(locales: &mut [Locale]) {
        locales.sort_by(Locale::cmp_by_name);
    }

    /// Load metadata from `metadata_path` and every sibling collection file.
    ///
    /// Returns `Ok(false)` when the metadata file does not exist or has no
    /// containing folder. Collections found on disk replace loaded
    /// collections with the same key; others are kept.
    pub fn load(&mut self, metadata_path: &Path) -> Result<bool> {
        if !metadata_path.is_file() {
            debug!(
                locale = %self.key,
                path = %metadata_path.display(),
                "Locale metadata file does not exist"
            );
            return Ok(false);
        }

        let metadata_path = std::path::absolute(metadata_path)?;
        let Some(folder) = containing_folder(&metadata_path) else {
            return Ok(false);
        };

        // Nothing on `self` changes until metadata and every collection parsed.
        let metadata = Metadata::read(&document::parse_file(&metadata_path)?)?;

        let mut loaded = BTreeMap::new();
        for path in collection_files(folder, &metadata_path)? {
            let Some(collection_key) = collection_key_for(&path) else {
                continue;
            };

            let mut collection = StringCollection::new(collection_key.as_str());
            collection.load(&path)?;
            loaded.insert(collection_key, collection);
        }

        metadata.apply_to(self);
        self.collections.extend(loaded);

        info!(
            locale = %self.key,
            name = %self.name,
            collections = self.collections.len(),
            "Loaded locale"
        );
        LocaleMetrics::global().record_locale_loaded();

        Ok(true)
    }

    /// Write metadata to `path` and, when `export_strings` is set, every
    /// collection to a sibling file named `<collection key>.<extension>`.
    ///
    /// Pending version bumps are applied to every exported collection.
    /// Returns `Ok(false)` when collections should be exported but `path`
    /// has no containing folder; metadata is written either way.
    pub fn save(&mut self, path: &Path, export_strings: bool) -> Result<bool> {
        let path = std::path::absolute(path)?;
        document::write_file(&self.to_metadata_document(), &path)?;

        if export_strings {
            let Some(folder) = containing_folder(&path) else {
                return Ok(false);
            };
            let metadata_stem = collection_key_for(&path);
            let extension = path.extension().map(|ext| ext.to_string_lossy().into_owned());

            for collection in self.collections.values_mut() {
                if metadata_stem.as_deref() == Some(collection.key()) {
                    warn!(
                        locale = %self.key,
                        collection = collection.key(),
                        "Collection shares the metadata file name, not exported"
                    );
                    continue;
                }

                let file_name = match &extension {
                    Some(extension) => format!("{}.{}", collection.key(), extension),
                    None => collection.key().to_string(),
                };
                collection.save(&folder.join(file_name))?;
            }
        }

        info!(
            locale = %self.key,
            path = %path.display(),
            export_strings,
            "Saved locale"
        );
        LocaleMetrics::global().record_locale_saved();

        Ok(true)
    }

    fn to_metadata_document(&self) -> Element {
        let locale = Element::new("locale")
            .with_child(Element::new("name").with_text(self.name.as_str()))
            .with_child(Element::new("rtl").with_text(self.right_to_left.to_string()))
            .with_child(Element::new("parentLocale").with_text(self.parent_locale.as_str()));

        Element::new("localization").with_child(locale)
    }
}

/// Parsed `<locale>` metadata element.
struct Metadata {
    name: String,
    right_to_left: bool,
    parent_locale: String,
}

impl Metadata {
    fn read(root: &Element) -> Result<Self> {
        let locale = root
            .find("/localization/locale")
            .ok_or(LocaleError::IncompleteLocale { element: "locale" })?;

        let name = locale
            .child("name")
            .ok_or(LocaleError::IncompleteLocale { element: "name" })?;

        Ok(Self {
            name: name.text().to_string(),
            right_to_left: locale.child("rtl").is_some_and(|rtl| rtl.text() == "true"),
            parent_locale: locale
                .child("parentLocale")
                .map(|parent| parent.text().to_string())
                .unwrap_or_default(),
        })
    }

    fn apply_to(self, locale: &mut Locale) {
        locale.name = self.name;
        locale.right_to_left = self.right_to_left;
        locale.parent_locale = self.parent_locale;
    }
}

fn containing_folder(path: &Path) -> Option<&Path> {
    path.parent().filter(|folder| !folder.as_os_str().is_empty())
}

/// Files in `folder` sharing the metadata file's extension, excluding the
/// metadata file itself, sorted by path.
fn collection_files(folder: &Path, metadata_path: &Path) -> Result<Vec<PathBuf>> {
    let extension = metadata_path.extension();
    let metadata_lower = metadata_path.to_string_lossy().to_lowercase();

    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let same_extension = match (path.extension(), extension) {
            (Some(found), Some(wanted)) => found.eq_ignore_ascii_case(wanted),
            (None, None) => true,
            _ => false,
        };
        if !same_extension || path.to_string_lossy().to_lowercase() == metadata_lower {
            continue;
        }

        files.push(path);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;
    use crate::i18n::StringTranslation;
    use tempfile::TempDir;

    fn metadata(xml: &str) -> Result<Locale> {
        let mut locale = Locale::new("de");
        Metadata::read(&parse_str(xml)?)?.apply_to(&mut locale);
        Ok(locale)
    }

    fn collection(key: &str, entries: &[(&str, &str)]) -> StringCollection {
        let mut collection = StringCollection::new(key);
        for (key, value) in entries {
            collection.insert(StringTranslation::new(*key, *value));
        }
        collection
    }

    // ==================== Metadata Tests ====================

    #[test]
    fn test_metadata_all_fields() {
        let locale = metadata(
            "<localization><locale><name>العربية</name><rtl>true</rtl><parentLocale>en</parentLocale></locale></localization>",
        )
        .expect("Should parse");

        assert_eq!(locale.name(), "العربية");
        assert!(locale.right_to_left());
        assert_eq!(locale.parent_locale(), "en");
        assert!(locale.has_parent());
    }

    #[test]
    fn test_metadata_defaults() {
        let locale = metadata("<localization><locale><name>Deutsch</name></locale></localization>")
            .expect("Should parse");

        assert!(!locale.right_to_left());
        assert_eq!(locale.parent_locale(), "");
        assert!(!locale.has_parent());
    }

    #[test]
    fn test_metadata_rtl_requires_exact_true() {
        for text in ["True", "TRUE", "1", " true", "yes", ""] {
            let xml = format!(
                "<localization><locale><name>x</name><rtl>{text}</rtl></locale></localization>"
            );
            let locale = metadata(&xml).expect("Should parse");
            assert!(!locale.right_to_left(), "rtl text {text:?}");
        }
    }

    #[test]
    fn test_metadata_missing_name() {
        let err = metadata("<localization><locale><rtl>true</rtl></locale></localization>")
            .unwrap_err();
        assert!(matches!(err, LocaleError::IncompleteLocale { element: "name" }));
    }

    #[test]
    fn test_metadata_missing_locale_element() {
        let err = metadata("<localization><name>x</name></localization>").unwrap_err();
        assert!(matches!(err, LocaleError::IncompleteLocale { element: "locale" }));
    }

    #[test]
    fn test_metadata_wrong_root() {
        let err = metadata("<locale><name>x</name></locale>").unwrap_err();
        assert!(matches!(err, LocaleError::IncompleteLocale { element: "locale" }));
    }

    #[test]
    fn test_metadata_document_shape() {
        let mut locale = Locale::new("he");
        locale.set_name("עברית");
        locale.set_right_to_left(true);

        let root = locale.to_metadata_document();
        assert_eq!(
            root.find("/localization/locale/name").map(Element::text),
            Some("עברית")
        );
        assert_eq!(
            root.find("/localization/locale/rtl").map(Element::text),
            Some("true")
        );
        assert_eq!(
            root.find("/localization/locale/parentLocale").map(Element::text),
            Some("")
        );
    }

    // ==================== Collection Map Tests ====================

    #[test]
    fn test_set_collections_reindexes_last_writer_wins() {
        let mut locale = Locale::new("en");
        locale.insert_collection(collection("old", &[("a", "A")]));

        locale.set_collections(vec![
            collection("common", &[("ok", "OK")]),
            collection("errors", &[("e1", "Bad")]),
            collection("common", &[("ok", "Okay")]),
        ]);

        let keys: Vec<_> = locale.collections().map(StringCollection::key).collect();
        assert_eq!(keys, vec!["common", "errors"]);
        assert_eq!(locale.get_string("common", "ok").unwrap(), "Okay");
        assert!(locale.collection("old").is_none());
    }

    #[test]
    fn test_collection_keys_match_map_keys() {
        let mut locale = Locale::new("en");
        locale.insert_collection(collection("menu", &[]));
        locale.insert_collection(collection("errors", &[]));

        for (key, collection) in &locale.collections {
            assert_eq!(key, collection.key());
        }
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_string() {
        let mut locale = Locale::new("en");
        locale.insert_collection(collection("common", &[("ok", "OK")]));

        assert_eq!(locale.get_string("common", "ok").unwrap(), "OK");

        let missing_key = locale.get_string("common", "missing").unwrap_err();
        assert!(matches!(missing_key, LocaleError::KeyNotFound { .. }));

        let missing_collection = locale.get_string("missing", "ok").unwrap_err();
        assert!(matches!(
            missing_collection,
            LocaleError::CollectionNotFound { .. }
        ));
    }

    #[test]
    fn test_serialize_locale() {
        let mut locale = Locale::new("en");
        locale.set_name("English");
        locale.insert_collection(collection("common", &[("ok", "OK")]));

        let json = serde_json::to_value(&locale).expect("Should serialize");
        assert_eq!(json["key"], "en");
        assert_eq!(json["rightToLeft"], false);
        assert_eq!(json["parentLocale"], "");
        assert_eq!(json["collections"]["common"]["strings"]["ok"]["value"], "OK");
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_sort_by_name() {
        let mut locales: Vec<Locale> = [("fr", "Français"), ("de", "Deutsch"), ("en", "English")]
            .into_iter()
            .map(|(key, name)| {
                let mut locale = Locale::new(key);
                locale.set_name(name);
                locale
            })
            .collect();

        Locale::sort_by_name(&mut locales);
        let names: Vec<_> = locales.iter().map(Locale::name).collect();
        assert_eq!(names, vec!["Deutsch", "English", "Français"]);
    }

    #[test]
    fn test_cmp_by_name_is_ordinal() {
        let mut upper = Locale::new("a");
        upper.set_name("Zulu");
        let mut lower = Locale::new("b");
        lower.set_name("afrikaans");

        assert_eq!(upper.cmp_by_name(&lower), Ordering::Less);
    }

    // ==================== Load/Save Tests ====================

    #[test]
    fn test_load_missing_file_returns_false() {
        let dir = TempDir::new().expect("create temp dir");
        let mut locale = Locale::new("en");

        let loaded = locale.load(&dir.path().join("nope.xml")).expect("No error");
        assert!(!loaded);
    }

    #[test]
    fn test_load_directory_returns_false() {
        let dir = TempDir::new().expect("create temp dir");
        let mut locale = Locale::new("en");

        assert!(!locale.load(dir.path()).expect("No error"));
    }

    #[test]
    fn test_failed_load_leaves_locale_untouched() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("meta.xml");
        fs::write(
            &path,
            "<localization><locale><name>New</name><rtl>true</rtl><parentLocale>en</parentLocale></locale></localization>",
        )
        .expect("write metadata");
        fs::write(
            dir.path().join("a.xml"),
            r#"<localization><strings><string key="fresh">Fresh</string></strings></localization>"#,
        )
        .expect("write a.xml");
        fs::write(
            dir.path().join("b.xml"),
            r#"<localization><strings><string key="d"/><string key="d"/></strings></localization>"#,
        )
        .expect("write b.xml");

        let mut locale = Locale::new("de");
        locale.set_name("Old");
        locale.insert_collection(collection("existing", &[("ok", "OK")]));
        let before = locale.clone();

        let err = locale.load(&path).unwrap_err();
        assert!(matches!(err, LocaleError::DuplicateKey { ref key, .. } if key == "d"));

        assert_eq!(locale, before);
        assert_eq!(locale.name(), "Old");
        assert!(!locale.right_to_left());
        assert!(!locale.has_parent());
        assert!(locale.collection("a").is_none());
        assert_eq!(locale.get_string("existing", "ok").unwrap(), "OK");
    }

    #[test]
    fn test_save_skips_collection_named_like_metadata() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("locale.xml");

        let mut locale = Locale::new("en");
        locale.set_name("English");
        locale.insert_collection(collection("locale", &[("a", "A")]));

        assert!(locale.save(&path, true).expect("Should save"));

        let mut reloaded = Locale::new("en");
        assert!(reloaded.load(&path).expect("Should load"));
        assert_eq!(reloaded.name(), "English");
        assert_eq!(reloaded.collections().count(), 0);
    }

    #[test]
    fn test_save_metadata_only() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("locale.xml");

        let mut locale = Locale::new("en");
        locale.set_name("English");
        locale.insert_collection(collection("common", &[("ok", "OK")]));

        assert!(locale.save(&path, false).expect("Should save"));
        assert!(path.is_file());
        assert!(!dir.path().join("common.xml").exists());
    }
}
