//! Collation type fallback
//!
//! Picks the concrete collation type from a locale's `collations` table:
//!
//! 1. requested type (or the table's default when none was requested)
//! 2. `search` when a longer `search…` type is missing (`searchjl` → `search`)
//! 3. the table's default type, read with locale fallback
//!
//! The default type itself falls back to `standard` when the table (and its
//! parents) declare none.

use crate::error::{Error, Result};
use crate::resource::{Bundle, Lookup, ResourceStore};
use tracing::debug;

/// Default collation type when the data declares none
pub const DEFAULT_COLLATION_TYPE: &str = "standard";

/// Key of the default type inside a `collations` table
pub const DEFAULT_TYPE_KEY: &str = "default";

/// Only this prefix family is truncated during type fallback
const SEARCH_PREFIX: &str = "search";

/// Outcome of type resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// The type whose data was found
    pub collation_type: String,
    /// Default type declared by the `collations` table
    pub default_type: String,
    /// `collations/<collation_type>` table
    pub data: Bundle,
    /// True when the requested type was replaced by a fallback
    pub type_fallback: bool,
}

/// Resolves collation types against a store
pub struct TypeResolver<'a> {
    store: &'a dyn ResourceStore,
}

impl<'a> TypeResolver<'a> {
    pub fn new(store: &'a dyn ResourceStore) -> Self {
        Self { store }
    }

    /// Default type of a `collations` table, `standard` when undeclared
    pub fn default_type(&self, collations: &Bundle) -> String {
        match self.store.string_with_fallback(collations, DEFAULT_TYPE_KEY) {
            Lookup::Found(default_type) => default_type,
            Lookup::Absent => DEFAULT_COLLATION_TYPE.to_string(),
        }
    }

    /// Find the data table for `requested`, applying type fallback.
    ///
    /// Returns [`Error::NoTailoringFound`] when every candidate is missing.
    pub fn resolve(&self, collations: &Bundle, requested: Option<&str>) -> Result<ResolvedType> {
        let default_type = self.default_type(collations);
        let mut collation_type = requested.unwrap_or(default_type.as_str()).to_string();
        let mut type_fallback = false;

        let mut data = self.store.sub_bundle(collations, &collation_type);

        if !data.is_found() {
            if let Some(prefix) = search_prefix(&collation_type).map(str::to_string) {
                debug!("Collation type {:?} not found, trying {:?}", collation_type, prefix);
                collation_type = prefix;
                type_fallback = true;
                data = self.store.sub_bundle(collations, &collation_type);
            }
        }

        if !data.is_found() && collation_type != default_type {
            debug!(
                "Collation type {:?} not found, falling back to default {:?}",
                collation_type, default_type
            );
            collation_type = default_type.clone();
            type_fallback = true;
            data = self.store.sub_bundle(collations, &collation_type);
        }

        match data {
            Lookup::Found(data) => Ok(ResolvedType {
                collation_type,
                default_type,
                data,
                type_fallback,
            }),
            Lookup::Absent => Err(Error::NoTailoringFound {
                locale: collations.resolved_locale().clone(),
                requested: requested.map(str::to_string),
            }),
        }
    }
}

/// `search` prefix of a longer type (`searchjl`, `SEARCHjl`), preserving case
fn search_prefix(collation_type: &str) -> Option<&str> {
    if collation_type.len() <= SEARCH_PREFIX.len() {
        return None;
    }
    collation_type
        .get(..SEARCH_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(SEARCH_PREFIX))
}
