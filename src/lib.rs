//! restyle - layered style configuration resolution
//!
//! Lets consumers restyle pre-built UI components without forking them by
//! merging a component's default style configuration with project-wide and
//! per-instance overrides, then assembling the per-element attribute bags
//! the rendering layer binds.

pub mod attrs;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod variant;

pub use attrs::{AssembleOptions, AttributeAssembler, AttributeSet, CallSite, ResolvedAttributes};
pub use config::{
    is_reserved_key, merge_configs, ConfigError, GlobalConfig, MergeStrategy, StyleConfig,
    StyleValue,
};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Layer};
pub use engine::{compute, merge_component, Merged, RenderInputs, RenderOutput};
pub use variant::{resolve_variant_classes, VariantProps};

pub use restyle_classes::merge_classes;
