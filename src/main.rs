//! locale-store - inspect and maintain locale resource folders
//!
//! Usage:
//!   locale-store list                                      # All locales, sorted by display name
//!   locale-store show <locale>                             # JSON summary of one locale
//!   locale-store get <locale> <collection> <key> [--resolve]
//!   locale-store validate <locale>                         # Check against the parent locale
//!   locale-store bump <locale> <collection> <key>          # Increment a string's version
//!   locale-store resave <locale>                           # Load and write back
//!
//! Optional environment variables:
//! - LOCALE_DIR (defaults to locales)
//! - LOCALE_METADATA_FILE (defaults to locale.xml)
//! - LOCALE_EXPORT_STRINGS (defaults to true)

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use locale_store::config::Config;
use locale_store::i18n::{LocaleMetrics, LocaleValidator};
use locale_store::{Locale, LocaleRegistry};

const USAGE: &str = "Usage: locale-store <list | show <locale> | get <locale> <collection> <key> [--resolve] | validate <locale> | bump <locale> <collection> <key> | resave <locale>>";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocaleSummary<'a> {
    key: &'a str,
    name: &'a str,
    right_to_left: bool,
    parent_locale: &'a str,
    collections: Vec<CollectionSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct CollectionSummary<'a> {
    key: &'a str,
    entries: usize,
    aliased: usize,
    derived: usize,
}

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_store=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["list"] => list(&config)?,
        ["show", locale] => show(&config, locale)?,
        ["get", locale, collection, key] => get(&config, locale, collection, key, false)?,
        ["get", locale, collection, key, "--resolve"] => {
            get(&config, locale, collection, key, true)?
        }
        ["validate", locale] => validate(&config, locale)?,
        ["bump", locale, collection, key] => bump(&config, locale, collection, key)?,
        ["resave", locale] => resave(&config, locale)?,
        _ => bail!(USAGE),
    }

    debug!(metrics = ?LocaleMetrics::global().report(), "Done");
    Ok(())
}

/// Load one locale, failing if its metadata file does not exist.
fn load_locale(config: &Config, key: &str) -> Result<Locale> {
    let path = config.metadata_path(key);
    let mut locale = Locale::new(key);

    let loaded = locale
        .load(&path)
        .with_context(|| format!("Failed to load locale '{}' from {}", key, path.display()))?;
    if !loaded {
        bail!("No locale '{}' at {}", key, path.display());
    }

    Ok(locale)
}

/// Load `key` and its chain of parent locales into a registry.
fn load_with_parents(config: &Config, key: &str) -> Result<LocaleRegistry> {
    let mut registry = LocaleRegistry::new();
    let mut next = Some(key.to_string());

    while let Some(current) = next.take() {
        if registry.get(&current).is_some() {
            break;
        }

        let locale = match load_locale(config, &current) {
            Ok(locale) => locale,
            Err(e) if current != key => {
                warn!("Parent locale '{}' unavailable: {:#}", current, e);
                break;
            }
            Err(e) => return Err(e),
        };

        if locale.has_parent() {
            next = Some(locale.parent_locale().to_string());
        }
        registry.insert(locale);
    }

    Ok(registry)
}

fn list(config: &Config) -> Result<()> {
    let mut registry = LocaleRegistry::new();

    registry
        .load_all(&config.locale_dir, &config.metadata_file)
        .with_context(|| format!("Failed to read {}", config.locale_dir.display()))?;

    info!("Found {} locales", registry.len());
    for locale in registry.list_sorted() {
        let direction = if locale.right_to_left() { "rtl" } else { "ltr" };
        println!(
            "{}\t{}\t{}\t{}",
            locale.key(),
            locale.name(),
            direction,
            locale.parent_locale()
        );
    }

    Ok(())
}

fn show(config: &Config, key: &str) -> Result<()> {
    let locale = load_locale(config, key)?;

    let summary = LocaleSummary {
        key: locale.key(),
        name: locale.name(),
        right_to_left: locale.right_to_left(),
        parent_locale: locale.parent_locale(),
        collections: locale
            .collections()
            .map(|collection| CollectionSummary {
                key: collection.key(),
                entries: collection.len(),
                aliased: collection.iter().filter(|t| t.is_aliased()).count(),
                derived: collection.iter().filter(|t| t.derive_from_parent()).count(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn get(config: &Config, locale: &str, collection: &str, key: &str, resolve: bool) -> Result<()> {
    let value = if resolve {
        load_with_parents(config, locale)?.resolve(locale, collection, key)?
    } else {
        load_locale(config, locale)?
            .get_string(collection, key)?
            .to_string()
    };

    println!("{}", value);
    Ok(())
}

fn validate(config: &Config, key: &str) -> Result<()> {
    let registry = load_with_parents(config, key)?;
    let locale = registry
        .get(key)
        .with_context(|| format!("Locale '{}' was not loaded", key))?;

    let report = LocaleValidator::validate(locale, registry.parent_of(key));
    for error in &report.errors {
        println!("error: {}", error);
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    if report.has_errors() {
        bail!("Locale '{}' has {} validation errors", key, report.errors.len());
    }

    info!(
        "Locale '{}' validated with {} warnings",
        key,
        report.warnings.len()
    );
    Ok(())
}

fn bump(config: &Config, locale_key: &str, collection: &str, key: &str) -> Result<()> {
    let mut locale = load_locale(config, locale_key)?;

    let translation = locale
        .collection_mut(collection)
        .with_context(|| format!("No collection '{}' in locale '{}'", collection, locale_key))?
        .get_mut(key)
        .with_context(|| format!("No string '{}' in collection '{}'", key, collection))?;
    translation.set_bump_version(true);

    locale.save(&config.metadata_path(locale_key), true)?;

    let version = locale
        .collection(collection)
        .and_then(|c| c.get(key))
        .map(|t| t.version())
        .unwrap_or_default();
    println!("{}/{} is now at version {}", collection, key, version);
    Ok(())
}

fn resave(config: &Config, key: &str) -> Result<()> {
    let mut locale = load_locale(config, key)?;
    let path = config.metadata_path(key);

    if !locale.save(&path, config.export_strings)? {
        bail!("Could not determine the folder of {}", path.display());
    }

    info!("Saved locale '{}' to {}", key, path.display());
    Ok(())
}
