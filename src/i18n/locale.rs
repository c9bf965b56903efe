//! Locale type: a locale identifier validated against the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry, ValueEncoding};
use crate::properties;
use anyhow::{bail, Result};
use std::fmt;

/// A supported locale.
///
/// Only identifiers present in the [`LocaleRegistry`] can be turned into a
/// `Locale`, so holding one means its file and encoding are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const EN: Locale = Locale { code: "en" };
    pub const ZH: Locale = Locale { code: "zh" };
    pub const ZH_CN: Locale = Locale { code: "zh_CN" };
    pub const ZH_TW: Locale = Locale { code: "zh_TW" };

    /// Create a Locale from an identifier string.
    ///
    /// # Example
    /// ```ignore
    /// let traditional = Locale::from_code("zh_TW")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Locale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) => Ok(Locale { code: config.code }),
            None => bail!("Unsupported locale: '{}'", code),
        }
    }

    /// All supported locales in registry order.
    pub fn all() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    /// Locales that are maintained on their own (everything but mirrors).
    pub fn primary() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_primary()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    pub fn config(&self) -> &'static LocaleConfig {
        // Locales can only be built from registry entries
        match LocaleRegistry::get().get_by_code(self.code) {
            Some(config) => config,
            None => unreachable!("locale {} is not registered", self.code),
        }
    }

    /// File name backing this locale.
    pub fn file_name(&self) -> &'static str {
        self.config().file_name
    }

    /// Locales that must receive a copy of every value written here.
    pub fn mirrors(&self) -> Vec<Locale> {
        LocaleRegistry::get()
            .mirrors_of(self.code)
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    /// Encode a value the way this locale's file stores it.
    pub fn encode_value(&self, value: &str) -> String {
        match self.config().encoding {
            ValueEncoding::Plain => properties::escape_line_breaks(value),
            ValueEncoding::UnicodeEscape => properties::escape_unicode(value),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
