//! Tailoring resolution
//!
//! [`TailoringBuilder::resolve`] maps a locale (with an optional
//! `collation=<type>` keyword) to a tailoring:
//!
//! ```text
//! open bundle ── absent ──────────────────────────────┐
//!   │                                                 │
//! collations ── absent ───────────────────────────────┤
//!   │                                                 ├─> root tailoring
//! type fallback ── exhausted ─────────────────────────┤
//!   │                                                 │
//! root + "standard" ── equal ─────────────────────────┘
//!   │
//! read %%CollationBin ── failure ──> TailoringDataCorrupt
//!   │
//! annotate valid/actual locales ──> new tailoring
//! ```
//!
//! Only a payload failure is an error; every other dead end resolves to the
//! root tailoring supplied by the caller.

use crate::error::{Error, Result};
use crate::reader::{ReadError, TailoringReader};
use crate::resource::{Lookup, ResourceStore, COLLATION_TREE};
use crate::root_rules::ROOT_RULES;
use crate::tailoring::Tailoring;
use crate::type_resolver::{TypeResolver, DEFAULT_COLLATION_TYPE, DEFAULT_TYPE_KEY};
use colltail_common::{Locale, COLLATION_KEYWORD};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key of the binary tailoring payload in a type table
pub const COLLATION_BIN_KEY: &str = "%%CollationBin";

/// Key of the optional rule string in a type table
pub const SEQUENCE_KEY: &str = "Sequence";

const COLLATIONS_KEY: &str = "collations";

/// Result of [`TailoringBuilder::resolve`]
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Either the caller's root tailoring or a freshly built one
    pub tailoring: Arc<Tailoring>,
    /// Most specific locale with collation data, `collation` keyword
    /// present only when the type differs from its default
    pub valid_locale: Locale,
    /// Type whose data was used; `None` when the root was returned
    pub collation_type: Option<String>,
    /// True when the requested type was replaced during type fallback
    pub type_fallback: bool,
}

impl Resolution {
    fn root(root: &Arc<Tailoring>, valid_locale: Locale) -> Self {
        Self {
            tailoring: Arc::clone(root),
            valid_locale,
            collation_type: None,
            type_fallback: false,
        }
    }

    /// Locale whose data was used, keyword-adjusted
    pub fn actual_locale(&self) -> &Locale {
        &self.tailoring.actual_locale
    }

    /// True when `root` itself was returned
    pub fn is_root(&self, root: &Arc<Tailoring>) -> bool {
        Arc::ptr_eq(&self.tailoring, root)
    }
}

/// Builds tailorings from a resource store
///
/// Holds no per-resolution state; one builder can serve many threads.
#[derive(Clone)]
pub struct TailoringBuilder {
    store: Arc<dyn ResourceStore>,
    reader: Arc<dyn TailoringReader>,
    tree: String,
}

impl TailoringBuilder {
    pub fn new(store: Arc<dyn ResourceStore>, reader: Arc<dyn TailoringReader>) -> Self {
        Self {
            store,
            reader,
            tree: COLLATION_TREE.to_string(),
        }
    }

    /// Read collation data from `tree` instead of the default tree
    pub fn with_tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = tree.into();
        self
    }

    pub fn tree(&self) -> &str {
        &self.tree
    }

    pub fn store(&self) -> &dyn ResourceStore {
        self.store.as_ref()
    }

    /// Root rule string from the process-wide cache
    pub fn root_rules(&self) -> Result<&'static str> {
        ROOT_RULES.get_root_rules(self.store.as_ref(), &self.tree)
    }

    /// Resolve the tailoring for `locale`.
    ///
    /// The requested type comes from the locale's `collation` keyword.
    /// Returns `root` itself (pointer-equal) whenever no distinct tailoring
    /// applies.
    pub fn resolve(&self, locale: &Locale, root: &Arc<Tailoring>) -> Result<Resolution> {
        let store = self.store.as_ref();

        let bundle = match store.open_bundle(&self.tree, locale) {
            Lookup::Found(bundle) => bundle,
            Lookup::Absent => {
                debug!("{}: locale unknown to tree {:?}, using root", locale, self.tree);
                return Ok(Resolution::root(root, Locale::root()));
            }
        };

        let valid_locale = bundle.resolved_locale().clone();

        let collations = match store.sub_bundle(&bundle, COLLATIONS_KEY) {
            Lookup::Found(collations) => collations,
            Lookup::Absent => {
                debug!("{}: no collations table, using root", locale);
                return Ok(Resolution::root(root, valid_locale));
            }
        };

        let requested = locale.keyword(COLLATION_KEYWORD);
        let resolved = match TypeResolver::new(store).resolve(&collations, requested) {
            Ok(resolved) => resolved,
            Err(Error::NoTailoringFound { .. }) => {
                debug!("{}: no tailoring for type {:?}, using root", locale, requested);
                return Ok(Resolution::root(root, valid_locale));
            }
            Err(e) => return Err(e),
        };

        if resolved.type_fallback {
            warn!(
                "{}: collation type {:?} unavailable, using {:?}",
                locale, requested, resolved.collation_type
            );
        }

        let collation_type = resolved.collation_type;
        let actual_locale = resolved.data.resolved_locale().clone();

        if actual_locale.is_root() && collation_type == DEFAULT_COLLATION_TYPE {
            debug!("{}: resolves to root standard, using root", locale);
            return Ok(Resolution::root(root, valid_locale));
        }

        let mut tailoring = Tailoring::seeded_from(root, actual_locale.clone());

        let payload = match store.binary(&resolved.data, COLLATION_BIN_KEY) {
            Lookup::Found(payload) => payload,
            Lookup::Absent => {
                return Err(corrupt(&actual_locale, &collation_type, ReadError::MissingPayload))
            }
        };
        self.reader
            .read(root, &payload, &mut tailoring)
            .map_err(|e| corrupt(&actual_locale, &collation_type, e))?;

        if let Lookup::Found(rules) = store.string(&resolved.data, SEQUENCE_KEY) {
            tailoring.rules = Some(rules);
        }

        // Type annotations are suppressed when they match the default,
        // judged per locale: the actual locale may declare another default.
        let annotated_valid = if collation_type != resolved.default_type {
            valid_locale.with_keyword(COLLATION_KEYWORD, &collation_type)
        } else {
            valid_locale.clone()
        };

        let actual_default = if actual_locale != valid_locale {
            self.locale_default_type(&actual_locale)
        } else {
            resolved.default_type
        };

        if collation_type != actual_default {
            tailoring.actual_locale = actual_locale.with_keyword(COLLATION_KEYWORD, &collation_type);
        }

        debug!(
            "{}: resolved type {:?} (valid {}, actual {})",
            locale, collation_type, annotated_valid, tailoring.actual_locale
        );

        Ok(Resolution {
            tailoring: Arc::new(tailoring),
            valid_locale: annotated_valid,
            collation_type: Some(collation_type),
            type_fallback: resolved.type_fallback,
        })
    }

    /// Rule string (`Sequence`) for `collation_type` as seen from `locale`
    pub fn load_rules(&self, locale: &Locale, collation_type: &str) -> Result<String> {
        let store = self.store.as_ref();

        let bundle = store
            .open_bundle(&self.tree, locale)
            .found()
            .ok_or_else(|| Error::LocaleUnknown(locale.clone()))?;

        let path = format!("{}/{}", COLLATIONS_KEY, collation_type);
        let data = store.sub_bundle(&bundle, &path).found().ok_or_else(|| {
            Error::NotFound(format!("collation type {:?} for {}", collation_type, locale))
        })?;

        store.string(&data, SEQUENCE_KEY).found().ok_or_else(|| {
            Error::NotFound(format!(
                "rules for collation type {:?} in {}",
                collation_type,
                data.resolved_locale()
            ))
        })
    }

    /// Default type declared for `locale` itself (with parent fallback)
    fn locale_default_type(&self, locale: &Locale) -> String {
        let store = self.store.as_ref();
        let bundle = match store.open_bundle(&self.tree, locale) {
            Lookup::Found(bundle) => bundle,
            Lookup::Absent => {
                warn!("{}: cannot reopen actual locale bundle", locale);
                return DEFAULT_COLLATION_TYPE.to_string();
            }
        };

        let path = format!("{}/{}", COLLATIONS_KEY, DEFAULT_TYPE_KEY);
        match store.string_with_fallback(&bundle, &path) {
            Lookup::Found(default_type) => default_type,
            Lookup::Absent => DEFAULT_COLLATION_TYPE.to_string(),
        }
    }
}

fn corrupt(locale: &Locale, collation_type: &str, source: ReadError) -> Error {
    warn!(
        "Corrupt tailoring data for {} type {:?}: {}",
        locale, collation_type, source
    );
    Error::TailoringDataCorrupt {
        locale: locale.clone(),
        collation_type: collation_type.to_string(),
        source,
    }
}
