//! Translation store: one properties file per locale under a base directory.
//!
//! Stores are loaded on demand and written back in full (sorted rewrite)
//! through an atomic rename. Nothing is cached between calls.

use crate::i18n::Locale;
use crate::properties::{self, Properties};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of writing a single key into a locale file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The key was new to the file
    Inserted,
    /// The key existed and its value was replaced
    Updated,
}

#[derive(Debug, Clone)]
pub struct TranslationStore {
    base_path: PathBuf,
}

impl TranslationStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Full path of the file backing `locale`.
    pub fn path_for(&self, locale: Locale) -> PathBuf {
        self.base_path.join(locale.file_name())
    }

    /// Create an empty file for `locale` if it does not exist yet.
    pub fn ensure_exists(&self, locale: Locale) -> Result<()> {
        let path = self.path_for(locale);
        if path.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.base_path).with_context(|| {
            format!("Failed to create directory '{}'", self.base_path.display())
        })?;
        fs::write(&path, "")
            .with_context(|| format!("Failed to create '{}'", path.display()))?;
        debug!("Created empty {}", path.display());

        Ok(())
    }

    /// Load the current mapping for `locale`, creating the file if needed.
    pub fn load(&self, locale: Locale) -> Result<Properties> {
        self.ensure_exists(locale)?;
        self.read(locale)
    }

    /// Read the current mapping for `locale` without touching the disk.
    ///
    /// A missing file reads as an empty store.
    pub fn read(&self, locale: Locale) -> Result<Properties> {
        let path = self.path_for(locale);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(properties::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Properties::new()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read '{}'", path.display()))
            }
        }
    }

    /// Persist `mapping` as the full content of `locale`'s file.
    pub fn write(&self, locale: Locale, mapping: &Properties) -> Result<()> {
        self.ensure_exists(locale)?;
        let path = self.path_for(locale);
        properties::write_atomic(&path, &properties::serialize(mapping))
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        debug!("Wrote {} entries to {}", mapping.len(), path.display());
        Ok(())
    }

    /// Insert or replace a single (already encoded) value.
    pub fn upsert(&self, locale: Locale, key: &str, value: &str) -> Result<Upsert> {
        let mut mapping = self.load(locale)?;
        let previous = mapping.insert(key.to_string(), value.to_string());
        self.write(locale, &mapping)?;

        Ok(match previous {
            Some(_) => Upsert::Updated,
            None => Upsert::Inserted,
        })
    }
}
