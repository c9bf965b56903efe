//! Keeps a directory of locale-keyed `.properties` files consistent.
//!
//! Translations are added through the [`reconcile::Reconciler`], which
//! detects conflicts, asks for confirmation once per call, writes every
//! locale file atomically in sorted order and mirrors `zh` into `zh_CN`.
//! [`audit::Auditor`] reports keys missing from each locale.

pub mod audit;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod i18n;
pub mod properties;
pub mod provider;
pub mod reconcile;
pub mod store;
