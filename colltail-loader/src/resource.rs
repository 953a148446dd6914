//! Resource store interface
//!
//! The loader never reads resource data directly. Everything goes through a
//! [`ResourceStore`], which maps `(tree, locale)` to hierarchical bundles and
//! applies its own locale fallback. Lookups return [`Lookup`] so each
//! fallback step is an explicit match rather than a null check.

use colltail_common::Locale;
use std::fmt;

/// Name of the collation data tree
pub const COLLATION_TREE: &str = "coll";

/// Result of a store lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Absent => Lookup::Absent,
        }
    }

    /// Try `next` only when this lookup is absent
    pub fn or_else(self, next: impl FnOnce() -> Lookup<T>) -> Lookup<T> {
        match self {
            Lookup::Found(value) => Lookup::Found(value),
            Lookup::Absent => next(),
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::Absent,
        }
    }
}

/// Handle to a table inside a store
///
/// `resolved_locale` is the locale whose data actually holds this table,
/// after the store's fallback. It never carries keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bundle {
    tree: String,
    locale: Locale,
    path: String,
}

impl Bundle {
    /// `path` is `/`-separated and relative to the locale's top-level table
    pub fn new(tree: impl Into<String>, locale: Locale, path: impl Into<String>) -> Self {
        Self {
            tree: tree.into(),
            locale: locale.base_locale(),
            path: path.into(),
        }
    }

    pub fn tree(&self) -> &str {
        &self.tree
    }

    pub fn resolved_locale(&self) -> &Locale {
        &self.locale
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full path of `key` below this bundle
    pub fn key_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.path, key)
        }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.tree, self.locale, self.path)
    }
}

/// Hierarchical, locale-aware resource store
///
/// Implementations must be cheap local lookups; the loader calls them
/// synchronously and holds no locks while doing so.
pub trait ResourceStore: Send + Sync {
    /// Open the top-level bundle for `locale` (keywords ignored).
    ///
    /// Falls back through parent locales; `Absent` only when nothing,
    /// including root, exists in `tree`.
    fn open_bundle(&self, tree: &str, locale: &Locale) -> Lookup<Bundle>;

    /// Table at `path` below `bundle`, searching parent locales of the
    /// bundle's locale when the bundle itself lacks it.
    fn sub_bundle(&self, bundle: &Bundle, path: &str) -> Lookup<Bundle>;

    /// String directly under `bundle` (no fallback)
    fn string(&self, bundle: &Bundle, key: &str) -> Lookup<String>;

    /// Binary blob directly under `bundle` (no fallback)
    fn binary(&self, bundle: &Bundle, key: &str) -> Lookup<Vec<u8>>;

    /// String at `path` below `bundle`, searching parent locales
    fn string_with_fallback(&self, bundle: &Bundle, path: &str) -> Lookup<String>;
}
