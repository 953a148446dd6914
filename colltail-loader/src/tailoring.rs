//! Tailoring entity and collation settings

use colltail_common::Locale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Comparison strength level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Primary,
    Secondary,
    #[default]
    Tertiary,
    Quaternary,
    Identical,
}

/// Handling of variable-weighted characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlternateHandling {
    #[default]
    NonIgnorable,
    Shifted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFirst {
    #[default]
    Off,
    Lower,
    Upper,
}

/// Highest character group affected by `AlternateHandling::Shifted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxVariable {
    Space,
    #[default]
    Punct,
    Symbol,
    Currency,
}

/// Collation behavior parameters
///
/// Non-root tailorings start from a copy of the root's settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub strength: Strength,
    pub alternate: AlternateHandling,
    pub case_first: CaseFirst,
    pub max_variable: MaxVariable,
    /// French secondary ordering
    pub backwards_secondary: bool,
    pub case_level: bool,
    pub numeric: bool,
    /// Script reordering codes, in order
    pub reorder_codes: Vec<String>,
}

/// Opaque tailoring payload (weight tables and the like)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData(Arc<[u8]>);

impl BinaryData {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for BinaryData {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

/// Resolved sort-rule entity
///
/// Built once per resolution and shared behind `Arc`; never mutated after
/// the loader hands it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tailoring {
    /// Human-authored rule sequence, when the data supplied one
    pub rules: Option<String>,
    /// Locale whose stored data was used, possibly with `collation=<type>`
    pub actual_locale: Locale,
    pub settings: Settings,
    pub data: BinaryData,
}

impl Tailoring {
    /// Build the root tailoring
    pub fn root(settings: Settings, rules: Option<String>) -> Self {
        Self {
            rules,
            actual_locale: Locale::root(),
            settings,
            data: BinaryData::default(),
        }
    }

    /// Empty tailoring seeded with the root's settings
    pub fn seeded_from(root: &Tailoring, actual_locale: Locale) -> Self {
        Self {
            rules: None,
            actual_locale,
            settings: root.settings.clone(),
            data: BinaryData::default(),
        }
    }
}
