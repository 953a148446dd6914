//! # colltail Loader Library
//!
//! Resolves a locale (and optional `collation=<type>` keyword) to a
//! collation tailoring, applying locale fallback from the resource store,
//! collation type fallback, and root equivalence.
//!
//! **Collaborators** are injected as traits:
//! - [`ResourceStore`]: hierarchical locale data (see [`MemoryStore`])
//! - [`TailoringReader`]: payload decoding (see [`JsonSettingsReader`])
//!
//! The root tailoring is supplied by the caller and returned unchanged
//! whenever no distinct tailoring applies.

pub mod error;
pub mod loader;
pub mod memory;
pub mod reader;
pub mod resource;
pub mod root_rules;
pub mod tailoring;
pub mod type_resolver;

pub use error::{Error, Result};
pub use loader::{Resolution, TailoringBuilder};
pub use memory::{MemoryStore, ResourceValue};
pub use reader::{JsonSettingsReader, ReadError, TailoringReader};
pub use resource::{Bundle, Lookup, ResourceStore, COLLATION_TREE};
pub use root_rules::{RootRuleCache, ROOT_RULES};
pub use tailoring::{BinaryData, Settings, Tailoring};
pub use type_resolver::{ResolvedType, TypeResolver, DEFAULT_COLLATION_TYPE};
