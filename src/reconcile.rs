//! Reconciliation engine: adds or updates one key across several locales.
//!
//! Each call runs Collect, ConflictCheck, Confirm, Apply and MirrorPropagate
//! in that order. Confirmation happens once per call, before any file is
//! written, so a declined overwrite leaves every file untouched. Writes to a
//! locale with mirrors (`zh`) are copied to the mirrors (`zh_CN`) without
//! asking again.

use crate::confirm::Confirm;
use crate::i18n::{KeyValidator, Locale};
use crate::properties::{self, Properties};
use crate::store::{TranslationStore, Upsert};
use anyhow::{bail, Result};
use tracing::{info, warn};

/// An existing value that the call would overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub locale: Locale,
    /// Stored value, decoded for display
    pub current: String,
    /// Value the caller asked for
    pub proposed: String,
}

/// What happened to one file during a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub locale: Locale,
    pub file_name: &'static str,
    pub upsert: Upsert,
    /// Set when the write was propagated from the mirror source
    pub mirrored_from: Option<Locale>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The key already existed and the overwrite was declined
    Cancelled,
    /// All writes were applied, in order
    Applied(Vec<FileChange>),
}

impl AddOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AddOutcome::Cancelled)
    }

    pub fn changes(&self) -> &[FileChange] {
        match self {
            AddOutcome::Cancelled => &[],
            AddOutcome::Applied(changes) => changes,
        }
    }
}

/// One locale targeted by the current call, with its loaded file.
struct Target {
    locale: Locale,
    proposed: String,
    encoded: String,
    mapping: Properties,
}

pub struct Reconciler<'a> {
    store: &'a TranslationStore,
    confirm: &'a mut dyn Confirm,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a TranslationStore, confirm: &'a mut dyn Confirm) -> Self {
        Self { store, confirm }
    }

    /// Add or update `key` with the given `(locale, value)` pairs.
    ///
    /// Unsupported and mirror locales are skipped with a warning. If a locale
    /// appears twice, the last value wins.
    pub fn add_translation(
        &mut self,
        key: &str,
        translations: &[(String, String)],
    ) -> Result<AddOutcome> {
        let report = KeyValidator::validate(key);
        if report.has_errors() {
            bail!("Invalid key: {}", report.errors.join("; "));
        }
        if report.has_warnings() {
            warn!("{}", report.warnings.join("; "));
        }

        let targets = self.collect(key, translations)?;
        if targets.is_empty() {
            warn!("No supported locale given for '{}', nothing to do", key);
            return Ok(AddOutcome::Applied(Vec::new()));
        }

        let conflicts = find_conflicts(key, &targets);
        if !conflicts.is_empty() && !self.confirm_overwrite(key, &conflicts)? {
            info!("Update of '{}' cancelled", key);
            return Ok(AddOutcome::Cancelled);
        }

        self.apply(key, targets).map(AddOutcome::Applied)
    }

    fn collect(&self, key: &str, translations: &[(String, String)]) -> Result<Vec<Target>> {
        let mut targets: Vec<Target> = Vec::new();

        for (code, value) in translations {
            let locale = match Locale::from_code(code) {
                Ok(locale) => locale,
                Err(e) => {
                    warn!("{}, skipping translation for '{}'", e, key);
                    continue;
                }
            };
            if let Some(source) = locale.config().mirror_of {
                warn!(
                    "Locale '{}' mirrors '{}' and cannot be written directly, skipping",
                    locale, source
                );
                continue;
            }

            if value.trim() != value {
                warn!(
                    "Value for '{}' in {} has surrounding whitespace, which is dropped when the file is read",
                    key, locale
                );
            }

            let encoded = locale.encode_value(value);
            if let Some(existing) = targets.iter_mut().find(|t| t.locale == locale) {
                existing.proposed = value.clone();
                existing.encoded = encoded;
                continue;
            }

            let mapping = self.store.load(locale)?;
            targets.push(Target {
                locale,
                proposed: value.clone(),
                encoded,
                mapping,
            });
        }

        Ok(targets)
    }

    fn confirm_overwrite(&mut self, key: &str, conflicts: &[Conflict]) -> Result<bool> {
        let mut prompt = format!("Key '{}' already exists in:", key);
        for conflict in conflicts {
            prompt.push_str(&format!(
                "\n  {}: {}\n  new value: {}",
                conflict.locale, conflict.current, conflict.proposed
            ));
        }
        prompt.push_str("\nUpdate these translations?");

        self.confirm.confirm(&prompt)
    }

    fn apply(&self, key: &str, targets: Vec<Target>) -> Result<Vec<FileChange>> {
        let mut changes = Vec::new();

        for Target {
            locale,
            encoded,
            mut mapping,
            ..
        } in targets
        {
            let upsert = match mapping.insert(key.to_string(), encoded.clone()) {
                Some(_) => Upsert::Updated,
                None => Upsert::Inserted,
            };
            self.store.write(locale, &mapping)?;
            info!("Updated {}", locale.file_name());
            changes.push(FileChange {
                locale,
                file_name: locale.file_name(),
                upsert,
                mirrored_from: None,
            });

            for mirror in locale.mirrors() {
                let upsert = self.store.upsert(mirror, key, &encoded)?;
                info!("Synced {} from {}", mirror.file_name(), locale);
                changes.push(FileChange {
                    locale: mirror,
                    file_name: mirror.file_name(),
                    upsert,
                    mirrored_from: Some(locale),
                });
            }
        }

        Ok(changes)
    }
}

fn find_conflicts(key: &str, targets: &[Target]) -> Vec<Conflict> {
    targets
        .iter()
        .filter_map(|target| {
            target.mapping.get(key).map(|current| Conflict {
                locale: target.locale,
                current: properties::unescape(current),
                proposed: target.proposed.clone(),
            })
        })
        .collect()
}
