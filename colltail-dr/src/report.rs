//! Resolution reports for display and JSON export

use colltail_common::Locale;
use colltail_loader::{Resolution, Settings, Tailoring};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Build identification
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub build_timestamp: String,
    pub build_profile: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: env!("GIT_HASH").to_string(),
            build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
            build_profile: env!("BUILD_PROFILE").to_string(),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{} [{}] built {} ({})",
            self.version, self.git_hash, self.build_timestamp, self.build_profile
        )
    }
}

/// Outcome of resolving one requested locale
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub requested: Locale,
    pub valid_locale: Locale,
    pub actual_locale: Locale,
    pub collation_type: Option<String>,
    pub type_fallback: bool,
    /// True when the root tailoring itself was returned
    pub root: bool,
    pub rules: Option<String>,
    pub payload_bytes: usize,
    pub settings: Settings,
}

impl ResolutionReport {
    pub fn new(requested: &Locale, resolution: &Resolution, root: &Arc<Tailoring>) -> Self {
        let tailoring = &resolution.tailoring;
        Self {
            requested: requested.clone(),
            valid_locale: resolution.valid_locale.clone(),
            actual_locale: resolution.actual_locale().clone(),
            collation_type: resolution.collation_type.clone(),
            type_fallback: resolution.type_fallback,
            root: resolution.is_root(root),
            rules: tailoring.rules.clone(),
            payload_bytes: tailoring.data.len(),
            settings: tailoring.settings.clone(),
        }
    }
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.requested)?;
        writeln!(f, "  valid locale:  {}", self.valid_locale)?;
        writeln!(f, "  actual locale: {}", self.actual_locale)?;
        match &self.collation_type {
            Some(t) if self.type_fallback => writeln!(f, "  type:          {} (fallback)", t)?,
            Some(t) => writeln!(f, "  type:          {}", t)?,
            None => writeln!(f, "  type:          (root)")?,
        }
        writeln!(f, "  root:          {}", if self.root { "yes" } else { "no" })?;
        writeln!(
            f,
            "  settings:      strength={:?} alternate={:?} case_first={:?} numeric={}",
            self.settings.strength, self.settings.alternate, self.settings.case_first, self.settings.numeric
        )?;
        if !self.settings.reorder_codes.is_empty() {
            writeln!(f, "  reorder:       {}", self.settings.reorder_codes.join(" "))?;
        }
        match &self.rules {
            Some(rules) => write!(f, "  rules:         {} chars", rules.chars().count()),
            None => write!(f, "  rules:         none"),
        }
    }
}
