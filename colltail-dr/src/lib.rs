//! colltail-dr library - Data Review tool
//!
//! Loads a TOML collation data tree and reports how locales resolve.

use colltail_loader::{JsonSettingsReader, MemoryStore, Settings, Tailoring, TailoringBuilder};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub mod report;

pub use report::{BuildInfo, ResolutionReport};

/// Builder over the data tree in `data_file`
pub fn open_builder(data_file: &Path, tree: &str) -> colltail_loader::Result<TailoringBuilder> {
    let store = MemoryStore::from_toml_file(data_file)?;
    Ok(TailoringBuilder::new(Arc::new(store), Arc::new(JsonSettingsReader)).with_tree(tree))
}

/// Root tailoring for review: default settings plus the cached root rules
///
/// Missing root rules are reported but not fatal; the root then has no rules.
pub fn root_tailoring(builder: &TailoringBuilder) -> Arc<Tailoring> {
    let rules = match builder.root_rules() {
        Ok(rules) => Some(rules.to_string()),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };
    Arc::new(Tailoring::root(Settings::default(), rules))
}
