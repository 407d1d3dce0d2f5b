//! Merge strategy selection

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keys::STRATEGY;
use super::value::{StyleConfig, StyleValue};
use crate::diagnostic::{DiagnosticKind, Diagnostics, Layer};

/// How overriding layers combine with the default configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Class strings are merged with conflict resolution.
    #[default]
    Merge,
    /// Leaves are replaced by the highest-priority defined value.
    Replace,
    /// Whole values (including sub-trees) are replaced.
    Overwrite,
}

impl MergeStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "merge" => Some(Self::Merge),
            "replace" => Some(Self::Replace),
            "overwrite" => Some(Self::Overwrite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Replace => "replace",
            Self::Overwrite => "overwrite",
        }
    }

    /// Whether leaf classes take the first defined value instead of merging.
    pub fn first_defined_wins(self) -> bool {
        !matches!(self, Self::Merge)
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a node's own `strategy` value.
///
/// Absent and `null` yield `None` silently; anything else that is not a
/// known strategy name is reported and ignored.
pub fn node_strategy(
    config: &StyleConfig,
    layer: Layer,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<MergeStrategy> {
    match config.get(STRATEGY)? {
        StyleValue::Empty => None,
        StyleValue::Raw(Value::String(s)) => {
            let parsed = MergeStrategy::parse(s);
            if parsed.is_none() {
                report_invalid(layer, path, diagnostics);
            }
            parsed
        }
        _ => {
            report_invalid(layer, path, diagnostics);
            None
        }
    }
}

fn report_invalid(layer: Layer, path: &str, diagnostics: &mut Diagnostics) {
    diagnostics.record(
        path,
        DiagnosticKind::MalformedShape {
            key: STRATEGY.to_string(),
            layer,
            expected: "merge|replace|overwrite".to_string(),
        },
    );
}

/// Pick the strategy for a node: instance, then global, then default, then
/// whatever the parent node used, then `merge`.
pub fn select(
    instance: Option<MergeStrategy>,
    global: Option<MergeStrategy>,
    default: Option<MergeStrategy>,
    inherited: Option<MergeStrategy>,
) -> MergeStrategy {
    instance
        .or(global)
        .or(default)
        .or(inherited)
        .unwrap_or_default()
}
