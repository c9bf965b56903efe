//! Read-only reports over the locale files: key listing, missing-key audit
//! and per-key lookup. None of these create or modify files.

use crate::i18n::Locale;
use crate::properties::{self, Properties};
use crate::store::TranslationStore;
use anyhow::Result;
use std::collections::BTreeSet;

/// Keys one locale lacks relative to the union of all locales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKeys {
    pub locale: Locale,
    pub file_name: &'static str,
    /// Sorted
    pub keys: Vec<String>,
}

pub struct Auditor<'a> {
    store: &'a TranslationStore,
}

impl<'a> Auditor<'a> {
    pub fn new(store: &'a TranslationStore) -> Self {
        Self { store }
    }

    fn load_all(&self) -> Result<Vec<(Locale, Properties)>> {
        Locale::all()
            .into_iter()
            .map(|locale| Ok((locale, self.store.read(locale)?)))
            .collect()
    }

    /// Every key known to any locale file, sorted.
    pub fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = BTreeSet::new();
        for (_, mapping) in self.load_all()? {
            keys.extend(mapping.into_keys());
        }
        Ok(keys.into_iter().collect())
    }

    /// Keys missing from each non-mirror locale, relative to the union of
    /// keys across all locales (mirror included). Complete locales are left
    /// out of the result.
    pub fn check_missing(&self) -> Result<Vec<MissingKeys>> {
        let stores = self.load_all()?;
        let all_keys: BTreeSet<&String> = stores.iter().flat_map(|(_, m)| m.keys()).collect();

        let audited = Locale::primary();

        let report = stores
            .iter()
            .filter(|(locale, _)| audited.contains(locale))
            .filter_map(|(locale, mapping)| {
                let keys: Vec<String> = all_keys
                    .iter()
                    .filter(|key| !mapping.contains_key(key.as_str()))
                    .map(|key| key.to_string())
                    .collect();
                (!keys.is_empty()).then(|| MissingKeys {
                    locale: *locale,
                    file_name: locale.file_name(),
                    keys,
                })
            })
            .collect();

        Ok(report)
    }

    /// Decoded value of `key` in every locale that has it, registry order.
    pub fn show_key(&self, key: &str) -> Result<Vec<(Locale, String)>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter_map(|(locale, mapping)| {
                mapping
                    .get(key)
                    .map(|value| (locale, properties::unescape(value)))
            })
            .collect())
    }
}
