//! Shared fixtures for colltail-loader integration tests

#![allow(dead_code)]

use colltail_common::Locale;
use colltail_loader::{JsonSettingsReader, MemoryStore, Settings, Tailoring, TailoringBuilder};
use std::path::PathBuf;
use std::sync::Arc;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tree.toml")
}

pub fn fixture_store() -> MemoryStore {
    MemoryStore::from_toml_file(&fixture_path()).expect("fixture tree must load")
}

pub fn builder_for(store: MemoryStore) -> TailoringBuilder {
    TailoringBuilder::new(Arc::new(store), Arc::new(JsonSettingsReader))
}

pub fn fixture_builder() -> TailoringBuilder {
    builder_for(fixture_store())
}

/// Root tailoring with a non-default setting so seeding is observable
pub fn root_tailoring() -> Arc<Tailoring> {
    Arc::new(Tailoring::root(
        Settings {
            numeric: true,
            ..Settings::default()
        },
        Some("&a<b<c".to_string()),
    ))
}

pub fn loc(s: &str) -> Locale {
    s.parse().expect("test locale must parse")
}
