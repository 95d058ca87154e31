//! Locale registry: the set of loaded locales and parent-locale fallback.
//!
//! A [`Locale`] only answers for its own strings. The registry owns several
//! locales at once so that lookups can walk the `parentLocale` chain for
//! entries that are missing or marked `deriveFromParent`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{LocaleError, Result};
use crate::i18n::Locale;

/// Loaded locales keyed by locale key.
#[derive(Debug, Default)]
pub struct LocaleRegistry {
    locales: BTreeMap<String, Locale>,
}

impl LocaleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a locale under its own key, returning any locale it replaced.
    pub fn insert(&mut self, locale: Locale) -> Option<Locale> {
        self.locales.insert(locale.key().to_string(), locale)
    }

    /// Get a locale by its key.
    ///
    /// # Returns
    /// * `Some(&Locale)` if the locale is registered
    /// * `None` otherwise
    pub fn get(&self, key: &str) -> Option<&Locale> {
        self.locales.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Locale> {
        self.locales.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// All registered locales ordered by display name.
    pub fn list_sorted(&self) -> Vec<&Locale> {
        let mut locales: Vec<&Locale> = self.locales.values().collect();
        locales.sort_by(|a, b| a.cmp_by_name(b));
        locales
    }

    /// The registered parent of `key`, if it has one.
    pub fn parent_of(&self, key: &str) -> Option<&Locale> {
        self.get(key)
            .filter(|locale| locale.has_parent())
            .and_then(|locale| self.get(locale.parent_locale()))
    }

    /// Load the locale `key` from `metadata_path` and register it.
    ///
    /// # Returns
    /// * `Ok(true)` if the locale was loaded and registered
    /// * `Ok(false)` if the metadata file does not exist (nothing is registered)
    /// * `Err` if the resources are incomplete or malformed
    pub fn load_locale(&mut self, key: &str, metadata_path: &Path) -> Result<bool> {
        let mut locale = Locale::new(key);
        if !locale.load(metadata_path)? {
            return Ok(false);
        }

        self.insert(locale);
        Ok(true)
    }

    /// Load every locale folder under `root` whose `metadata_file` exists.
    ///
    /// Each sub-folder name is a locale key. A folder whose resources fail
    /// to load is skipped with a warning so the remaining locales still
    /// register.
    ///
    /// # Returns
    /// * `Ok(n)` with the number of locales registered
    /// * `Err` only if `root` itself cannot be read
    pub fn load_all(&mut self, root: &Path, metadata_file: &str) -> Result<usize> {
        let mut folders = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                folders.push(entry.path());
            }
        }
        folders.sort();

        let mut loaded = 0;
        for folder in folders {
            let Some(key) = folder.file_name().map(|name| name.to_string_lossy().into_owned())
            else {
                continue;
            };

            match self.load_locale(&key, &folder.join(metadata_file)) {
                Ok(true) => loaded += 1,
                Ok(false) => {
                    debug!(folder = %folder.display(), metadata_file, "Skipping folder without metadata");
                }
                Err(e) => warn!(locale = %key, error = %e, "Skipping locale that failed to load"),
            }
        }

        Ok(loaded)
    }

    /// Look up `key` in `collection_key`, falling back along parent locales.
    ///
    /// An entry that exists and is not marked `deriveFromParent` answers the
    /// lookup with its effective (alias-resolved) value. Missing entries and
    /// derived entries defer to the parent locale; a derived entry whose
    /// parents lack the key, or hold it only as an unresolvable alias, falls
    /// back to its own value. An unregistered parent ends the walk.
    pub fn resolve(&self, locale_key: &str, collection_key: &str, key: &str) -> Result<String> {
        let mut locale = self
            .get(locale_key)
            .ok_or_else(|| LocaleError::LocaleNotFound {
                locale: locale_key.to_string(),
            })?;

        let mut visited: HashSet<&str> = HashSet::new();
        let mut derived_fallback: Option<&str> = None;
        let mut collection_seen = false;
        let mut deriving = false;

        loop {
            if !visited.insert(locale.key()) {
                return Err(LocaleError::ParentCycle {
                    locale: locale.key().to_string(),
                });
            }

            if let Some(collection) = locale.collection(collection_key) {
                collection_seen = true;

                if let Some(entry) = collection.get(key) {
                    if !entry.derive_from_parent() {
                        match collection.resolve(key) {
                            Ok(value) => return Ok(value.to_string()),
                            // A broken ancestor entry is a miss below a derived entry.
                            Err(err) if !deriving => return Err(err),
                            Err(err) => debug!(
                                locale = locale.key(),
                                collection = collection_key,
                                key,
                                error = %err,
                                "Skipping unresolvable parent entry"
                            ),
                        }
                    } else {
                        deriving = true;
                        if derived_fallback.is_none() {
                            derived_fallback = collection.resolve(key).ok();
                        }
                    }
                }
            }

            let Some(parent) = self.parent_of(locale.key()) else {
                break;
            };
            debug!(
                locale = locale.key(),
                parent = parent.key(),
                collection = collection_key,
                key,
                "Deferring lookup to parent locale"
            );
            locale = parent;
        }

        if let Some(value) = derived_fallback {
            return Ok(value.to_string());
        }

        if collection_seen {
            Err(LocaleError::KeyNotFound {
                collection: collection_key.to_string(),
                key: key.to_string(),
            })
        } else {
            Err(LocaleError::CollectionNotFound {
                collection: collection_key.to_string(),
            })
        }
    }
}
