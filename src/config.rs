use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Layout
    pub locale_dir: PathBuf,
    pub metadata_file: String,

    // Persistence
    pub export_strings: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Layout - one folder per locale key under LOCALE_DIR
            locale_dir: std::env::var("LOCALE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("locales")),
            metadata_file: std::env::var("LOCALE_METADATA_FILE")
                .unwrap_or_else(|_| "locale.xml".to_string()),

            // Persistence
            export_strings: match std::env::var("LOCALE_EXPORT_STRINGS") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("LOCALE_EXPORT_STRINGS must be true or false, got '{}'", value))?,
                Err(_) => true,
            },
        })
    }

    /// Folder holding the resources of `locale_key`.
    pub fn locale_folder(&self, locale_key: &str) -> PathBuf {
        self.locale_dir.join(locale_key)
    }

    /// Metadata file of `locale_key`.
    pub fn metadata_path(&self, locale_key: &str) -> PathBuf {
        self.locale_folder(locale_key).join(&self.metadata_file)
    }
}
