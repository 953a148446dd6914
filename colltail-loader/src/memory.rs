//! In-memory resource store
//!
//! Holds `tree → locale → table` data and implements [`ResourceStore`] with
//! parent-chain fallback (`zh_Hant_TW` → `zh_Hant` → `zh` → root).
//!
//! # TOML data files
//!
//! Each top-level table is a tree; each table below it is a locale's data:
//!
//! ```toml
//! [coll.root]
//! UCARules = "&a<b"
//!
//! [coll.root.collations]
//! default = "standard"
//!
//! [coll.root.collations.standard]
//! "%%CollationBin" = "{}"
//! ```
//!
//! Strings map to strings, arrays of integers (0..=255) to binary blobs, and
//! tables to tables. String values under keys starting with `%%` are stored
//! as binary (their UTF-8 bytes).

use crate::resource::{Bundle, Lookup, ResourceStore};
use colltail_common::{Error, Locale, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Prefix of keys whose string values are binary payloads
const BINARY_KEY_PREFIX: &str = "%%";

/// Value stored in a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceValue {
    String(String),
    Binary(Vec<u8>),
    Table(BTreeMap<String, ResourceValue>),
}

impl ResourceValue {
    pub fn table() -> Self {
        ResourceValue::Table(BTreeMap::new())
    }

    fn get_path(&self, path: &str) -> Option<&ResourceValue> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match current {
                ResourceValue::Table(entries) => current = entries.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Insert `value` at `path`, creating intermediate tables.
    ///
    /// Fails when a non-table value sits on the path.
    fn insert_path(&mut self, path: &str, value: ResourceValue) -> Result<()> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| Error::InvalidInput("empty resource path".to_string()))?;

        let mut current = self;
        for segment in parents {
            current = match current {
                ResourceValue::Table(entries) => entries
                    .entry(segment.to_string())
                    .or_insert_with(ResourceValue::table),
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "resource path {:?} crosses a non-table value",
                        path
                    )))
                }
            };
        }

        match current {
            ResourceValue::Table(entries) => {
                entries.insert(last.to_string(), value);
                Ok(())
            }
            _ => Err(Error::InvalidInput(format!(
                "resource path {:?} crosses a non-table value",
                path
            ))),
        }
    }
}

/// Resource store backed by in-process tables
#[derive(Debug, Default)]
pub struct MemoryStore {
    trees: HashMap<String, HashMap<Locale, ResourceValue>>,
    string_fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for `locale` at the `/`-separated `path`
    pub fn insert(
        &mut self,
        tree: &str,
        locale: &Locale,
        path: &str,
        value: ResourceValue,
    ) -> Result<()> {
        self.trees
            .entry(tree.to_string())
            .or_default()
            .entry(locale.base_locale())
            .or_insert_with(ResourceValue::table)
            .insert_path(path, value)
    }

    pub fn insert_string(&mut self, tree: &str, locale: &Locale, path: &str, value: &str) -> Result<()> {
        self.insert(tree, locale, path, ResourceValue::String(value.to_string()))
    }

    pub fn insert_binary(&mut self, tree: &str, locale: &Locale, path: &str, value: &[u8]) -> Result<()> {
        self.insert(tree, locale, path, ResourceValue::Binary(value.to_vec()))
    }

    /// Register `locale` in `tree` with an empty table
    pub fn insert_locale(&mut self, tree: &str, locale: &Locale) {
        self.trees
            .entry(tree.to_string())
            .or_default()
            .entry(locale.base_locale())
            .or_insert_with(ResourceValue::table);
    }

    /// Locales present in `tree`, sorted
    pub fn locales(&self, tree: &str) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self
            .trees
            .get(tree)
            .map(|locales| locales.keys().cloned().collect())
            .unwrap_or_default();
        locales.sort();
        locales
    }

    /// Number of string fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.string_fetches.load(Ordering::SeqCst)
    }

    /// Parse a TOML data tree
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: toml::Table = toml::from_str(content)
            .map_err(|e| Error::Parse(format!("invalid data tree: {}", e)))?;

        let mut store = MemoryStore::new();
        for (tree, locales) in document {
            let toml::Value::Table(locales) = locales else {
                return Err(Error::Parse(format!("tree {:?} must be a table", tree)));
            };
            for (locale_name, data) in locales {
                let locale = Locale::new(&locale_name)?;
                let toml::Value::Table(data) = data else {
                    return Err(Error::Parse(format!(
                        "locale {:?} in tree {:?} must be a table",
                        locale_name, tree
                    )));
                };
                let value = convert_table(data)?;
                store
                    .trees
                    .entry(tree.clone())
                    .or_default()
                    .insert(locale, value);
            }
        }

        Ok(store)
    }

    /// Load a TOML data tree from disk
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_toml_str(&content)
            .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;
        debug!(
            "Loaded data tree from {} ({} trees)",
            path.display(),
            store.trees.len()
        );
        Ok(store)
    }

    fn value(&self, tree: &str, locale: &Locale, path: &str) -> Option<&ResourceValue> {
        self.trees.get(tree)?.get(locale)?.get_path(path)
    }

    /// First locale in the parent chain of `start` holding `path`
    fn find_with_fallback<T>(
        &self,
        tree: &str,
        start: &Locale,
        path: &str,
        pick: impl Fn(&ResourceValue) -> Option<T>,
    ) -> Lookup<(Locale, T)> {
        start
            .fallback_chain()
            .into_iter()
            .find_map(|locale| {
                let picked = self.value(tree, &locale, path).and_then(&pick)?;
                Some((locale, picked))
            })
            .into()
    }
}

fn convert_table(table: toml::Table) -> Result<ResourceValue> {
    let mut entries = BTreeMap::new();
    for (key, value) in table {
        let converted = convert_value(&key, value)?;
        entries.insert(key, converted);
    }
    Ok(ResourceValue::Table(entries))
}

fn convert_value(key: &str, value: toml::Value) -> Result<ResourceValue> {
    match value {
        toml::Value::String(s) if key.starts_with(BINARY_KEY_PREFIX) => {
            Ok(ResourceValue::Binary(s.into_bytes()))
        }
        toml::Value::String(s) => Ok(ResourceValue::String(s)),
        toml::Value::Array(items) => {
            let bytes = items
                .into_iter()
                .map(|item| match item {
                    toml::Value::Integer(n) => u8::try_from(n).map_err(|_| {
                        Error::Parse(format!("byte out of range in {:?}: {}", key, n))
                    }),
                    other => Err(Error::Parse(format!(
                        "binary {:?} must hold integers, found {}",
                        key,
                        other.type_str()
                    ))),
                })
                .collect::<Result<Vec<u8>>>()?;
            Ok(ResourceValue::Binary(bytes))
        }
        toml::Value::Table(table) => convert_table(table),
        other => Err(Error::Parse(format!(
            "unsupported value type {} for key {:?}",
            other.type_str(),
            key
        ))),
    }
}

impl ResourceStore for MemoryStore {
    fn open_bundle(&self, tree: &str, locale: &Locale) -> Lookup<Bundle> {
        let Some(locales) = self.trees.get(tree) else {
            return Lookup::Absent;
        };
        locale
            .fallback_chain()
            .into_iter()
            .find(|candidate| locales.contains_key(candidate))
            .map(|found| Bundle::new(tree, found, ""))
            .into()
    }

    fn sub_bundle(&self, bundle: &Bundle, path: &str) -> Lookup<Bundle> {
        let full = bundle.key_path(path);
        self.find_with_fallback(bundle.tree(), bundle.resolved_locale(), &full, |value| {
            matches!(value, ResourceValue::Table(_)).then_some(())
        })
        .map(|(locale, ())| Bundle::new(bundle.tree(), locale, full.clone()))
    }

    fn string(&self, bundle: &Bundle, key: &str) -> Lookup<String> {
        self.string_fetches.fetch_add(1, Ordering::SeqCst);
        match self.value(bundle.tree(), bundle.resolved_locale(), &bundle.key_path(key)) {
            Some(ResourceValue::String(s)) => Lookup::Found(s.clone()),
            _ => Lookup::Absent,
        }
    }

    fn binary(&self, bundle: &Bundle, key: &str) -> Lookup<Vec<u8>> {
        match self.value(bundle.tree(), bundle.resolved_locale(), &bundle.key_path(key)) {
            Some(ResourceValue::Binary(bytes)) => Lookup::Found(bytes.clone()),
            _ => Lookup::Absent,
        }
    }

    fn string_with_fallback(&self, bundle: &Bundle, path: &str) -> Lookup<String> {
        self.string_fetches.fetch_add(1, Ordering::SeqCst);
        let full = bundle.key_path(path);
        self.find_with_fallback(bundle.tree(), bundle.resolved_locale(), &full, |value| match value {
            ResourceValue::String(s) => Some(s.clone()),
            _ => None,
        })
        .map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::COLLATION_TREE;

    fn loc(s: &str) -> Locale {
        s.parse().unwrap()
    }

    fn sample_store() -> MemoryStore {
        MemoryStore::from_toml_str(
            r#"
            [coll.root]
            UCARules = "&a<b"

            [coll.root.collations]
            default = "standard"

            [coll.root.collations.standard]
            "%%CollationBin" = [1, 2, 3]

            [coll.zh.collations]
            default = "pinyin"

            [coll.zh.collations.pinyin]
            "%%CollationBin" = "{}"
            Sequence = "&[before 2]a<<ā"

            [coll.zh_Hant.collations]
            default = "stroke"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_open_bundle_falls_back_to_parent() {
        let store = sample_store();
        let bundle = store.open_bundle(COLLATION_TREE, &loc("zh_Hant_TW")).found().unwrap();
        assert_eq!(bundle.resolved_locale(), &loc("zh_Hant"));

        let bundle = store.open_bundle(COLLATION_TREE, &loc("xx")).found().unwrap();
        assert!(bundle.resolved_locale().is_root());
    }

    #[test]
    fn test_open_bundle_unknown_tree_is_absent() {
        let store = sample_store();
        assert_eq!(store.open_bundle("brkitr", &loc("zh")), Lookup::Absent);
    }

    #[test]
    fn test_sub_bundle_reports_locale_where_found() {
        let store = sample_store();
        let bundle = store.open_bundle(COLLATION_TREE, &loc("zh_Hant")).found().unwrap();
        let collations = store.sub_bundle(&bundle, "collations").found().unwrap();
        assert_eq!(collations.resolved_locale(), &loc("zh_Hant"));

        let pinyin = store.sub_bundle(&collations, "pinyin").found().unwrap();
        assert_eq!(pinyin.resolved_locale(), &loc("zh"));
        assert_eq!(pinyin.path(), "collations/pinyin");
    }

    #[test]
    fn test_sub_bundle_ignores_non_tables() {
        let store = sample_store();
        let root = store.open_bundle(COLLATION_TREE, &Locale::root()).found().unwrap();
        let collations = store.sub_bundle(&root, "collations").found().unwrap();
        assert_eq!(store.sub_bundle(&collations, "default"), Lookup::Absent);
    }

    #[test]
    fn test_strings_and_binaries() {
        let store = sample_store();
        let root = store.open_bundle(COLLATION_TREE, &Locale::root()).found().unwrap();
        assert_eq!(store.string(&root, "UCARules"), Lookup::Found("&a<b".to_string()));
        assert_eq!(store.string(&root, "Missing"), Lookup::Absent);

        let standard = store.sub_bundle(&root, "collations/standard").found().unwrap();
        assert_eq!(store.binary(&standard, "%%CollationBin"), Lookup::Found(vec![1, 2, 3]));

        let zh = store.open_bundle(COLLATION_TREE, &loc("zh")).found().unwrap();
        let pinyin = store.sub_bundle(&zh, "collations/pinyin").found().unwrap();
        assert_eq!(store.binary(&pinyin, "%%CollationBin"), Lookup::Found(b"{}".to_vec()));
    }

    #[test]
    fn test_string_with_fallback_walks_parents() {
        let store = sample_store();
        let zh_tw = store.open_bundle(COLLATION_TREE, &loc("zh_Hant_TW")).found().unwrap();
        assert_eq!(
            store.string_with_fallback(&zh_tw, "collations/default"),
            Lookup::Found("stroke".to_string())
        );
        assert_eq!(
            store.string_with_fallback(&zh_tw, "UCARules"),
            Lookup::Found("&a<b".to_string())
        );
    }

    #[test]
    fn test_fetch_count_tracks_string_reads() {
        let store = sample_store();
        let root = store.open_bundle(COLLATION_TREE, &Locale::root()).found().unwrap();
        assert_eq!(store.fetch_count(), 0);
        let _ = store.string(&root, "UCARules");
        let _ = store.string_with_fallback(&root, "collations/default");
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn test_insert_builds_nested_tables() {
        let mut store = MemoryStore::new();
        store
            .insert_string(COLLATION_TREE, &loc("sv"), "collations/default", "reformed")
            .unwrap();
        store
            .insert_binary(COLLATION_TREE, &loc("sv"), "collations/reformed/%%CollationBin", b"{}")
            .unwrap();

        assert!(store
            .insert_string(COLLATION_TREE, &loc("sv"), "collations/default/x", "y")
            .is_err());
        assert_eq!(store.locales(COLLATION_TREE), vec![loc("sv")]);
    }

    #[test]
    fn test_bad_data_tree_rejected() {
        assert!(MemoryStore::from_toml_str("coll = 3").is_err());
        assert!(MemoryStore::from_toml_str("[coll]\nzh = \"x\"").is_err());
        assert!(MemoryStore::from_toml_str("[coll.zh]\nbin = [1, 300]").is_err());
        assert!(MemoryStore::from_toml_str("[coll.zh]\nflag = true").is_err());
        assert!(MemoryStore::from_toml_str("[coll.\"zh TW\"]\nx = \"y\"").is_err());
    }
}
