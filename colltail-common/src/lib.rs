//! # colltail Common Library
//!
//! Shared code for the colltail crates including:
//! - Locale identifiers with keywords
//! - Common error types
//! - Configuration loading and data file resolution
//! - Tracing setup

pub mod config;
pub mod error;
pub mod locale;
pub mod logging;

pub use error::{Error, Result};
pub use locale::{Locale, COLLATION_KEYWORD};
