//! Style configuration model and merge
//!
//! Three layers combine into one tree, lowest priority first:
//! 1. Component defaults
//! 2. Global (project-wide) overrides
//! 3. Instance overrides

pub mod compound;
mod error;
pub mod global;
pub mod keys;
pub mod merge;
pub mod strategy;
pub mod value;

pub use compound::{merge_compound_variants, predicates_equal, rule_class};
pub use error::ConfigError;
pub use global::{ConfigSource, GlobalConfig, GlobalHandle};
pub use keys::{is_reserved_key, ReservedKey};
pub use merge::{merge_configs, merge_tree, MergeContext, MergedTree};
pub use strategy::MergeStrategy;
pub use value::{ComponentRef, StyleConfig, StyleValue, ValueKind, VariantNode};
