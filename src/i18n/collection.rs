//! Keyed collection of translations backed by one resource file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::document::{self, Element};
use crate::error::{LocaleError, Result};
use crate::i18n::{LocaleMetrics, StringTranslation};

const ROOT_ELEMENT: &str = "localization";
const STRINGS_ELEMENT: &str = "strings";
const ENTRY_ELEMENT: &str = "string";

/// A named group of translations, e.g. "errors" or "menu".
///
/// Entries are indexed by their own key and iterate in ascending key order,
/// which is also the order they are written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringCollection {
    key: String,
    strings: BTreeMap<String, StringTranslation>,
}

impl StringCollection {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            strings: BTreeMap::new(),
        }
    }

    /// Load a collection whose key is the file name without its extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let key = collection_key_for(path).ok_or_else(|| LocaleError::MalformedEntry {
            path: path.to_path_buf(),
            reason: "cannot derive a collection key from the file name".to_string(),
        })?;

        let mut collection = Self::new(key);
        collection.load(path)?;
        Ok(collection)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&StringTranslation> {
        self.strings.get(key)
    }

    /// Mutable access to one entry. The entry's key cannot change, so the
    /// index stays consistent.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut StringTranslation> {
        self.strings.get_mut(key)
    }

    /// Insert a translation under its own key, returning any entry it replaced.
    pub fn insert(&mut self, translation: StringTranslation) -> Option<StringTranslation> {
        self.strings.insert(translation.key().to_string(), translation)
    }

    pub fn remove(&mut self, key: &str) -> Option<StringTranslation> {
        self.strings.remove(key)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &StringTranslation> {
        self.strings.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StringTranslation> {
        self.strings.values_mut()
    }

    /// Replace every entry. Later entries win when keys repeat.
    pub fn set_all<I>(&mut self, translations: I)
    where
        I: IntoIterator<Item = StringTranslation>,
    {
        self.strings.clear();
        for translation in translations {
            self.insert(translation);
        }
    }

    /// The stored value for `key`, without following aliases.
    pub fn value(&self, key: &str) -> Result<&str> {
        self.get(key)
            .map(StringTranslation::value)
            .ok_or_else(|| self.not_found(key))
    }

    /// The effective value for `key`.
    ///
    /// An alias resolves to its target's stored value. Only one hop is
    /// followed: a target that is itself an alias is an [`LocaleError::AliasChain`].
    pub fn resolve(&self, key: &str) -> Result<&str> {
        let translation = self.get(key).ok_or_else(|| self.not_found(key))?;
        if !translation.is_aliased() {
            return Ok(translation.value());
        }

        let target = self
            .get(translation.clone_of())
            .ok_or_else(|| self.not_found(translation.clone_of()))?;
        if target.is_aliased() {
            return Err(self.alias_chain(translation));
        }

        Ok(target.value())
    }

    /// Replace the table with the entries stored in `path`.
    ///
    /// The table is left untouched if the file is rejected.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let root = document::parse_file(path)?;
        let strings = self.parse_entries(&root, path)?;

        self.check_aliases(&strings)?;
        self.strings = strings;

        debug!(
            collection = %self.key,
            entries = self.strings.len(),
            path = %path.display(),
            "Loaded string collection"
        );
        LocaleMetrics::global().record_collection_loaded();

        Ok(())
    }

    /// Apply pending version bumps and write the table to `path`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bumped = self.apply_version_bumps();
        document::write_file(&self.to_document(), path)?;

        debug!(
            collection = %self.key,
            entries = self.strings.len(),
            bumped,
            path = %path.display(),
            "Saved string collection"
        );
        let metrics = LocaleMetrics::global();
        metrics.record_collection_saved();
        metrics.record_versions_bumped(bumped);

        Ok(())
    }

    pub(crate) fn apply_version_bumps(&mut self) -> usize {
        let mut bumped = 0;
        for translation in self.strings.values_mut() {
            if translation.apply_version_bump() {
                bumped += 1;
            }
        }
        bumped
    }

    pub(crate) fn to_document(&self) -> Element {
        let mut strings = Element::new(STRINGS_ELEMENT);

        for translation in self.strings.values() {
            let mut entry = Element::new(ENTRY_ELEMENT).with_attribute("key", translation.key());
            if translation.derive_from_parent() {
                entry = entry.with_attribute("deriveFromParent", "true");
            }
            if translation.is_aliased() {
                entry = entry.with_attribute("cloneOf", translation.clone_of());
            }
            entry = entry
                .with_attribute("version", translation.version().to_string())
                .with_text(translation.value());
            strings.push_child(entry);
        }

        Element::new(ROOT_ELEMENT).with_child(strings)
    }

    fn parse_entries(
        &self,
        root: &Element,
        path: &Path,
    ) -> Result<BTreeMap<String, StringTranslation>> {
        let mut strings = BTreeMap::new();

        let Some(container) = root.find(&format!("/{ROOT_ELEMENT}/{STRINGS_ELEMENT}")) else {
            warn!(
                collection = %self.key,
                path = %path.display(),
                "No strings element found, collection is empty"
            );
            return Ok(strings);
        };

        for element in container.children_named(ENTRY_ELEMENT) {
            let translation = parse_entry(element, path)?;
            if strings.contains_key(translation.key()) {
                return Err(LocaleError::DuplicateKey {
                    collection: self.key.clone(),
                    key: translation.key().to_string(),
                });
            }
            strings.insert(translation.key().to_string(), translation);
        }

        Ok(strings)
    }

    fn check_aliases(&self, strings: &BTreeMap<String, StringTranslation>) -> Result<()> {
        for translation in strings.values().filter(|t| t.is_aliased()) {
            match strings.get(translation.clone_of()) {
                Some(target) if target.is_aliased() => {
                    return Err(self.alias_chain(translation));
                }
                Some(_) => {}
                None => warn!(
                    collection = %self.key,
                    key = translation.key(),
                    target = translation.clone_of(),
                    "Alias target does not exist"
                ),
            }
        }

        Ok(())
    }

    fn not_found(&self, key: &str) -> LocaleError {
        LocaleError::KeyNotFound {
            collection: self.key.clone(),
            key: key.to_string(),
        }
    }

    fn alias_chain(&self, translation: &StringTranslation) -> LocaleError {
        LocaleError::AliasChain {
            collection: self.key.clone(),
            key: translation.key().to_string(),
            target: translation.clone_of().to_string(),
        }
    }
}

/// The collection key a resource file maps to: its file name minus the
/// extension. `None` when that is empty.
pub(crate) fn collection_key_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

fn parse_entry(element: &Element, path: &Path) -> Result<StringTranslation> {
    let key = element
        .attribute("key")
        .filter(|key| !key.is_empty())
        .ok_or_else(|| LocaleError::MalformedEntry {
            path: path.to_path_buf(),
            reason: "string entry without a key".to_string(),
        })?;

    let mut translation = StringTranslation::new(key, element.text());
    translation.set_derive_from_parent(element.attribute("deriveFromParent") == Some("true"));
    translation.set_clone_of(element.attribute("cloneOf").unwrap_or_default());

    if let Some(version) = element.attribute("version") {
        let version = version
            .parse::<u32>()
            .map_err(|e| LocaleError::MalformedEntry {
                path: path.to_path_buf(),
                reason: format!("invalid version '{version}' for string '{key}': {e}"),
            })?;
        translation.set_version(version);
    }

    Ok(translation)
}
