//! Locale registry: single source of truth for the supported locale files.
//!
//! The table is fixed at compile time and exposed through a lazily
//! initialised `OnceLock` singleton. It records which file backs each locale,
//! how its values are encoded, and the one mirror relationship (`zh_CN`
//! tracks `zh`).

use std::sync::OnceLock;

/// How values are encoded before they are written to a locale's file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEncoding {
    /// Stored as UTF-8; only line breaks are escaped.
    Plain,
    /// Stored as ASCII with `\uXXXX` escapes.
    UnicodeEscape,
}

/// Configuration for one supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Locale identifier as used on the command line (e.g. "en", "zh_TW")
    pub code: &'static str,

    /// File name inside the properties directory
    pub file_name: &'static str,

    /// Locale this one mirrors, if any. Mirrors are never written directly
    /// by callers and are excluded from audits.
    pub mirror_of: Option<&'static str>,

    /// Encoding applied to values before they are stored
    pub encoding: ValueEncoding,
}

impl LocaleConfig {
    /// Whether this locale only tracks another locale's content.
    pub fn is_mirror(&self) -> bool {
        self.mirror_of.is_some()
    }
}

/// Global locale registry singleton.
#[derive(Debug)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its identifier.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all locales in table order.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get every locale that is independently maintained (not a mirror).
    pub fn list_primary(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| !locale.is_mirror()).collect()
    }

    /// Get the mirrors of `code`, i.e. locales that must receive every write
    /// made to it.
    pub fn mirrors_of(&self, code: &str) -> Vec<&LocaleConfig> {
        self.locales
            .iter()
            .filter(|locale| locale.mirror_of == Some(code))
            .collect()
    }
}

/// Default locale table.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            file_name: "message-application.properties",
            mirror_of: None,
            encoding: ValueEncoding::Plain,
        },
        LocaleConfig {
            code: "zh",
            file_name: "message-application_zh.properties",
            mirror_of: None,
            encoding: ValueEncoding::UnicodeEscape,
        },
        LocaleConfig {
            code: "zh_CN",
            file_name: "message-application_zh_CN.properties",
            mirror_of: Some("zh"),
            encoding: ValueEncoding::UnicodeEscape,
        },
        LocaleConfig {
            code: "zh_TW",
            file_name: "message-application_zh_TW.properties",
            mirror_of: None,
            encoding: ValueEncoding::UnicodeEscape,
        },
    ]
}
