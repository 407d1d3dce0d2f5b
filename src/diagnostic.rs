//! Merge diagnostics
//!
//! Violations found while merging are never errors: each one is recorded
//! here, logged through `tracing`, and the merge continues with a fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which configuration layer supplied a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Default,
    Global,
    Instance,
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Default => "default",
            Layer::Global => "global",
            Layer::Instance => "instance",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an extends reference could not be followed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtendsFailure {
    /// Target key does not exist or is reserved.
    Unknown,
    /// Target is already being resolved higher up the chain.
    Cycle,
}

/// Machine-readable diagnostic kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail")]
pub enum DiagnosticKind {
    /// A layer supplied a key it is not allowed to override.
    #[serde(rename = "DISALLOWED_OVERRIDE")]
    DisallowedOverride { key: String, layer: Layer },

    /// A value does not have the expected shape.
    #[serde(rename = "MALFORMED_SHAPE")]
    MalformedShape {
        key: String,
        layer: Layer,
        expected: String,
    },

    /// An `{>key}` reference could not be resolved.
    #[serde(rename = "BROKEN_EXTENDS")]
    BrokenExtends {
        key: String,
        target: String,
        reason: ExtendsFailure,
    },
}

impl DiagnosticKind {
    /// Get a machine-readable string representation.
    pub fn to_code(&self) -> String {
        match self {
            DiagnosticKind::DisallowedOverride { key, layer } => {
                format!("DISALLOWED_OVERRIDE:{}@{}", key, layer)
            }
            DiagnosticKind::MalformedShape { key, layer, expected } => {
                format!("MALFORMED_SHAPE:{}@{}!={}", key, layer, expected)
            }
            DiagnosticKind::BrokenExtends { key, target, reason } => {
                let reason = match reason {
                    ExtendsFailure::Unknown => "unknown",
                    ExtendsFailure::Cycle => "cycle",
                };
                format!("BROKEN_EXTENDS:{}->{}:{}", key, target, reason)
            }
        }
    }
}

/// A recorded diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub kind: DiagnosticKind,

    /// Component being merged, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    /// Dot-separated config path of the offending node (empty for the root).
    pub path: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(component) = &self.component {
            write!(f, "[{}] ", component)?;
        }
        match &self.kind {
            DiagnosticKind::DisallowedOverride { key, layer } => write!(
                f,
                "`{}` cannot be set in {} configuration; value dropped",
                key, layer
            )?,
            DiagnosticKind::MalformedShape { key, layer, expected } => write!(
                f,
                "`{}` in {} configuration must be {}; treated as empty",
                key, layer, expected
            )?,
            DiagnosticKind::BrokenExtends {
                key,
                target,
                reason: ExtendsFailure::Unknown,
            } => write!(f, "`{}` extends unknown key `{}`", key, target)?,
            DiagnosticKind::BrokenExtends {
                key,
                target,
                reason: ExtendsFailure::Cycle,
            } => write!(f, "`{}` extends `{}` in a cycle", key, target)?,
        }
        if !self.path.is_empty() {
            write!(f, " (at {})", self.path)?;
        }
        Ok(())
    }
}

/// Collector for diagnostics raised during one merge pass.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    component: Option<String>,
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector that tags every record with a component name.
    pub fn for_component(component: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            records: Vec::new(),
        }
    }

    /// Record a diagnostic and log it.
    pub fn record(&mut self, path: &str, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            kind,
            component: self.component.clone(),
            path: path.to_string(),
        };
        tracing::warn!(code = %diagnostic.kind.to_code(), "{}", diagnostic);
        self.records.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    /// Machine-readable codes of all records, in order.
    pub fn codes(&self) -> Vec<String> {
        self.records.iter().map(|d| d.kind.to_code()).collect()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tags_component() {
        let mut diagnostics = Diagnostics::for_component("UButton");
        diagnostics.record(
            "",
            DiagnosticKind::DisallowedOverride {
                key: "safelist".to_string(),
                layer: Layer::Instance,
            },
        );

        assert_eq!(diagnostics.len(), 1);
        let first = diagnostics.iter().next().unwrap();
        assert_eq!(first.component.as_deref(), Some("UButton"));
        assert_eq!(diagnostics.codes(), vec!["DISALLOWED_OVERRIDE:safelist@instance"]);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::MalformedShape {
                key: "compoundVariants".to_string(),
                layer: Layer::Global,
                expected: "an array".to_string(),
            },
            component: None,
            path: "body".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "`compoundVariants` in global configuration must be an array; treated as empty (at body)"
        );
    }

    #[test]
    fn test_codes() {
        let kind = DiagnosticKind::BrokenExtends {
            key: "footer".to_string(),
            target: "header".to_string(),
            reason: ExtendsFailure::Cycle,
        };
        assert_eq!(kind.to_code(), "BROKEN_EXTENDS:footer->header:cycle");
    }

    #[test]
    fn test_serialization() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::DisallowedOverride {
                key: "component".to_string(),
                layer: Layer::Global,
            },
            component: Some("UModal".to_string()),
            path: "close".to_string(),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["type"], "DISALLOWED_OVERRIDE");
        assert_eq!(json["detail"]["layer"], "global");
        assert_eq!(json["component"], "UModal");
    }
}
