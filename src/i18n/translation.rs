//! A single translated string entry.

use serde::Serialize;

/// One key/value translation inside a [`StringCollection`](super::StringCollection).
///
/// The key is fixed at construction. `version` is owned by the persistence
/// layer: callers request an increment with [`set_bump_version`] and the
/// next save applies it.
///
/// [`set_bump_version`]: StringTranslation::set_bump_version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringTranslation {
    key: String,
    value: String,
    derive_from_parent: bool,
    clone_of: String,
    version: u32,
    #[serde(skip)]
    bump_version: bool,
}

impl StringTranslation {
    /// Create a translation at version 0 with no alias and no parent derivation.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            derive_from_parent: false,
            clone_of: String::new(),
            version: 0,
            bump_version: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Label used when listing entries in pickers and reports.
    pub fn display_key(&self) -> &str {
        &self.key
    }

    /// The stored value. For aliases this is not the effective value; use
    /// [`StringCollection::resolve`](super::StringCollection::resolve).
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Whether a lookup should prefer the parent locale's entry.
    pub fn derive_from_parent(&self) -> bool {
        self.derive_from_parent
    }

    pub fn set_derive_from_parent(&mut self, derive: bool) {
        self.derive_from_parent = derive;
    }

    /// Key of the entry this one mirrors, or an empty string.
    pub fn clone_of(&self) -> &str {
        &self.clone_of
    }

    pub fn set_clone_of(&mut self, target: impl Into<String>) {
        self.clone_of = target.into();
    }

    /// True iff `clone_of` is non-empty.
    pub fn is_aliased(&self) -> bool {
        !self.clone_of.is_empty()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Whether a version increment is pending for the next save.
    pub fn bump_version(&self) -> bool {
        self.bump_version
    }

    pub fn set_bump_version(&mut self, bump: bool) {
        self.bump_version = bump;
    }

    /// Apply a pending version bump. Returns true if the version changed.
    pub(crate) fn apply_version_bump(&mut self) -> bool {
        if !self.bump_version {
            return false;
        }

        self.version = self.version.saturating_add(1);
        self.bump_version = false;
        true
    }
}
