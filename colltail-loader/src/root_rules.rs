//! Process-wide cache of the root collation rule string
//!
//! The root rules (`UCARules` in the root bundle of the collation tree) are
//! large and immutable, so they are fetched at most once. Concurrent first
//! callers block on the same initialization; a failed fetch leaves the cache
//! empty so a later call can retry.

use crate::error::{Error, Result};
use crate::resource::{Lookup, ResourceStore};
use colltail_common::Locale;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

/// Key of the root rule string in the root bundle
pub const ROOT_RULES_KEY: &str = "UCARules";

/// Shared root-rule cache used by [`TailoringBuilder::root_rules`](crate::loader::TailoringBuilder::root_rules)
pub static ROOT_RULES: RootRuleCache = RootRuleCache::new();

/// Once-only holder of the root rule string
#[derive(Debug, Default)]
pub struct RootRuleCache {
    rules: OnceCell<String>,
}

impl RootRuleCache {
    pub const fn new() -> Self {
        Self {
            rules: OnceCell::new(),
        }
    }

    /// Root rules, fetching them from `store` on first use.
    ///
    /// Once populated the value is never replaced, whatever store later
    /// callers pass.
    pub fn get_root_rules(&self, store: &dyn ResourceStore, tree: &str) -> Result<&str> {
        self.rules
            .get_or_try_init(|| fetch_root_rules(store, tree))
            .map(String::as_str)
    }

    pub fn is_loaded(&self) -> bool {
        self.rules.get().is_some()
    }
}

fn fetch_root_rules(store: &dyn ResourceStore, tree: &str) -> Result<String> {
    debug!("Fetching root collation rules from tree {:?}", tree);

    let root = match store.open_bundle(tree, &Locale::root()) {
        Lookup::Found(bundle) if bundle.resolved_locale().is_root() => bundle,
        Lookup::Found(bundle) => {
            return Err(Error::CacheUnavailable(format!(
                "store resolved root to {} in tree {:?}",
                bundle.resolved_locale(),
                tree
            )))
        }
        Lookup::Absent => {
            return Err(Error::CacheUnavailable(format!(
                "no root bundle in tree {:?}",
                tree
            )))
        }
    };

    match store.string(&root, ROOT_RULES_KEY) {
        Lookup::Found(rules) => {
            info!("Loaded root collation rules ({} bytes)", rules.len());
            Ok(rules)
        }
        Lookup::Absent => Err(Error::CacheUnavailable(format!(
            "{} missing from root bundle of tree {:?}",
            ROOT_RULES_KEY, tree
        ))),
    }
}
