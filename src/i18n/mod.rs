//! Locale metadata and key rules.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported locale files
//! - `locale`: Type-safe `Locale` validated against the registry
//! - `validator`: Translation key validation
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_manager::i18n::Locale;
//!
//! let zh = Locale::from_code("zh")?;
//! assert_eq!(zh.mirrors(), vec![Locale::ZH_CN]);
//!
//! let audited = Locale::primary();
//! ```

mod locale;
mod registry;
mod validator;

pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry, ValueEncoding};
pub use validator::{KeyValidator, ValidationReport};
