//! Error types for colltail-loader
//!
//! `LocaleUnknown` and `NoTailoringFound` are recovered inside
//! [`TailoringBuilder::resolve`](crate::loader::TailoringBuilder::resolve) by
//! falling back to the root tailoring; they surface only from the lower-level
//! helpers. `TailoringDataCorrupt` and `CacheUnavailable` always reach the caller.

use crate::reader::ReadError;
use colltail_common::Locale;
use thiserror::Error;

/// Main error type for colltail-loader
#[derive(Error, Debug)]
pub enum Error {
    /// The store has no bundle for the locale or any of its parents
    #[error("Locale unknown to resource store: {0}")]
    LocaleUnknown(Locale),

    /// Type fallback chain exhausted
    #[error("No tailoring found for {locale} (requested type {requested:?})")]
    NoTailoringFound {
        locale: Locale,
        requested: Option<String>,
    },

    /// Binary tailoring payload missing or unreadable
    #[error("Failed to load collation tailoring data for locale {locale} type {collation_type}: {source}")]
    TailoringDataCorrupt {
        locale: Locale,
        collation_type: String,
        #[source]
        source: ReadError,
    },

    /// Root rule string could not be fetched
    #[error("Root collation rules unavailable: {0}")]
    CacheUnavailable(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration or data file errors
    #[error(transparent)]
    Common(#[from] colltail_common::Error),
}

/// Convenience Result type using colltail-loader Error
pub type Result<T> = std::result::Result<T, Error>;
