//! Command handlers behind the CLI.
//!
//! Each handler writes its user-facing output to the given writer so the
//! binary can pass stdout and tests can pass a buffer.

use crate::audit::Auditor;
use crate::config::{config_path, Config};
use crate::confirm::Confirm;
use crate::provider::TranslationProvider;
use crate::reconcile::{AddOutcome, Reconciler};
use crate::store::{TranslationStore, Upsert};
use anyhow::{bail, Result};
use std::io::Write;

/// Values given to `add`, one per supported command-line flag.
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub key: String,
    pub en: Option<String>,
    pub zh: Option<String>,
    pub zh_tw: Option<String>,
}

impl AddArgs {
    fn pairs(&self) -> Vec<(String, String)> {
        [("en", &self.en), ("zh", &self.zh), ("zh_TW", &self.zh_tw)]
            .into_iter()
            .filter_map(|(locale, value)| {
                value.as_ref().map(|value| (locale.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Changes requested through `config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub set_api_key: Option<String>,
    pub set_provider: Option<String>,
    pub set_model: Option<String>,
    pub set_base_url: Option<String>,
    pub set_default_path: Option<String>,
    pub show: bool,
}

impl ConfigArgs {
    fn has_changes(&self) -> bool {
        self.set_api_key.is_some()
            || self.set_provider.is_some()
            || self.set_model.is_some()
            || self.set_base_url.is_some()
            || self.set_default_path.is_some()
    }
}

fn print_outcome(out: &mut dyn Write, outcome: &AddOutcome) -> Result<()> {
    match outcome {
        AddOutcome::Cancelled => writeln!(out, "Update cancelled")?,
        AddOutcome::Applied(changes) if changes.is_empty() => {
            writeln!(out, "Nothing to write: no supported locale given")?
        }
        AddOutcome::Applied(changes) => {
            for change in changes {
                let verb = match (change.mirrored_from, change.upsert) {
                    (Some(_), _) => "Synced",
                    (None, Upsert::Inserted) => "Added to",
                    (None, Upsert::Updated) => "Updated",
                };
                writeln!(out, "{} {}", verb, change.file_name)?;
            }
        }
    }
    Ok(())
}

pub fn run_add(
    store: &TranslationStore,
    confirm: &mut dyn Confirm,
    args: &AddArgs,
    out: &mut dyn Write,
) -> Result<AddOutcome> {
    let pairs = args.pairs();
    if pairs.is_empty() {
        bail!("At least one translation is required (--en, --zh or --zh_TW)");
    }

    let outcome = Reconciler::new(store, confirm).add_translation(&args.key, &pairs)?;
    print_outcome(out, &outcome)?;
    Ok(outcome)
}

/// Translate `text`, show the result, and add it after confirmation.
///
/// Returns `None` when the user declines to add the translations.
pub async fn run_translate(
    provider: &TranslationProvider,
    store: &TranslationStore,
    confirm: &mut dyn Confirm,
    text: &str,
    key_override: Option<&str>,
    out: &mut dyn Write,
) -> Result<Option<AddOutcome>> {
    writeln!(out, "Translating: {}", text)?;
    let mut translation = provider.translate(text).await?;

    match key_override {
        Some(key) => {
            writeln!(out, "Using key: {} (generated: {})", key, translation.key)?;
            translation.key = key.to_string();
        }
        None => writeln!(out, "Generated key: {}", translation.key)?,
    }

    writeln!(out, "\nTranslations:")?;
    for (locale, text) in &translation.translations {
        writeln!(out, "{}: {}", locale, text)?;
    }
    writeln!(out)?;

    if !confirm.confirm("Add these translations?")? {
        writeln!(out, "Translations not added")?;
        return Ok(None);
    }

    let outcome =
        Reconciler::new(store, confirm).add_translation(&translation.key, &translation.pairs())?;
    print_outcome(out, &outcome)?;
    Ok(Some(outcome))
}

pub fn run_list(store: &TranslationStore, key: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let auditor = Auditor::new(store);

    if let Some(key) = key {
        let values = auditor.show_key(key)?;
        if values.is_empty() {
            bail!("Key '{}' not found", key);
        }
        writeln!(out, "Key: {}", key)?;
        for (locale, value) in values {
            writeln!(out, "  {}: {}", locale, value)?;
        }
        return Ok(());
    }

    let keys = auditor.list_keys()?;
    writeln!(out, "All translation keys ({}):", keys.len())?;
    for key in keys {
        writeln!(out, "{}", key)?;
    }
    Ok(())
}

/// Print missing keys per locale. Returns the number of missing entries.
pub fn run_check(store: &TranslationStore, out: &mut dyn Write) -> Result<usize> {
    let report = Auditor::new(store).check_missing()?;

    if report.is_empty() {
        writeln!(out, "All translations are complete!")?;
        return Ok(0);
    }

    let mut total = 0;
    for missing in &report {
        writeln!(out, "\n{} is missing {} keys:", missing.file_name, missing.keys.len())?;
        for key in &missing.keys {
            writeln!(out, "  - {}", key)?;
        }
        total += missing.keys.len();
    }
    writeln!(out, "\nFound {} missing translations", total)?;
    Ok(total)
}

/// Apply `config` changes to `config` and print it when asked.
///
/// Returns whether anything changed, in which case the caller saves.
pub fn run_config(config: &mut Config, args: &ConfigArgs, out: &mut dyn Write) -> Result<bool> {
    if !args.has_changes() && !args.show {
        bail!("No config action given; use --set-api-key, --set-provider, --set-model, --set-base-url, --set-default-path or --show");
    }

    // Provider first so the other settings land on the new provider
    if let Some(provider) = &args.set_provider {
        config.set_provider(provider)?;
        writeln!(out, "AI provider set to {}", provider)?;
    }
    if let Some(api_key) = &args.set_api_key {
        config.set_api_key(api_key)?;
        writeln!(out, "API key updated")?;
    }
    if let Some(model) = &args.set_model {
        config.set_model(model)?;
        writeln!(out, "Model set to {}", model)?;
    }
    if let Some(base_url) = &args.set_base_url {
        config.set_base_url(base_url)?;
        writeln!(out, "Base URL set to {}", base_url)?;
    }
    if let Some(path) = &args.set_default_path {
        config.set_default_path(path);
        writeln!(out, "Default path set to {}", path)?;
    }

    if args.show {
        let provider = config.provider()?;
        writeln!(out, "\nCurrent configuration:")?;
        if let Some(path) = config_path() {
            writeln!(out, "Config file: {}", path.display())?;
        }
        writeln!(out, "AI provider: {}", config.ai_provider)?;
        writeln!(out, "API key: {}", config.masked_api_key())?;
        writeln!(out, "Base URL: {}", provider.base_url)?;
        writeln!(out, "Model: {}", provider.model)?;
        writeln!(out, "Default path: {}", config.default_path)?;
        writeln!(out, "Request timeout: {}s", config.request_timeout_secs)?;
    }

    Ok(args.has_changes())
}
