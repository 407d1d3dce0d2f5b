//! Project-wide style configuration
//!
//! Loaded once, before the first merge, from a TOML or JSON file of the
//! shape `{ strategy?, components: { Name: StyleConfig } }`. After that it is
//! read-only and shared by every component instance.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::error::ConfigError;
use super::strategy::MergeStrategy;
use super::value::{json_type, StyleConfig};

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigSource {
    /// File path as given
    pub path: String,

    /// SHA-256 digest of raw file bytes
    pub digest: String,
}

/// Global configuration keyed by component name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalConfig {
    strategy: Option<MergeStrategy>,
    components: IndexMap<String, StyleConfig>,
    source: Option<ConfigSource>,
}

/// State of the process-wide global configuration.
#[derive(Debug, Clone, Copy)]
pub enum GlobalHandle {
    /// `install` has not been called yet.
    NotLoaded,
    Loaded(&'static GlobalConfig),
}

static INSTALLED: OnceLock<GlobalConfig> = OnceLock::new();

impl GlobalConfig {
    /// Empty configuration: every component uses its defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an already parsed document.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let root = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::empty()),
            other => {
                return Err(ConfigError::ShapeError(format!(
                    "global config must be an object, got {}",
                    json_type(other)
                )))
            }
        };

        let strategy = match root.get("strategy") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(MergeStrategy::parse(s).ok_or_else(|| {
                ConfigError::ShapeError(format!(
                    "unknown strategy `{}` (expected merge, replace or overwrite)",
                    s
                ))
            })?),
            Some(other) => {
                return Err(ConfigError::ShapeError(format!(
                    "strategy must be a string, got {}",
                    json_type(other)
                )))
            }
        };

        let mut components = IndexMap::new();
        match root.get("components") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (name, config) in map {
                    let config = StyleConfig::from_json(config).map_err(|e| {
                        ConfigError::ShapeError(format!("components.{}: {}", name, e))
                    })?;
                    components.insert(name.clone(), config);
                }
            }
            Some(other) => {
                return Err(ConfigError::ShapeError(format!(
                    "components must be an object, got {}",
                    json_type(other)
                )))
            }
        }

        for key in root.keys() {
            if key != "strategy" && key != "components" {
                tracing::debug!(key = %key, "ignoring unknown global config key");
            }
        }

        Ok(Self {
            strategy,
            components,
            source: None,
        })
    }

    /// Load from a file. `.toml` files are read as TOML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (value, digest) = read_config_file(path)?;
        let mut config = Self::from_value(&value)?;
        config.source = Some(ConfigSource {
            path: path.to_string_lossy().to_string(),
            digest,
        });
        tracing::debug!(
            path = %path.display(),
            components = config.components.len(),
            "loaded global style config"
        );
        Ok(config)
    }

    /// Load from a file, falling back to the empty configuration.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load global style config, using empty config"
                );
                Self::empty()
            }
        }
    }

    /// Add or replace one component's configuration.
    pub fn with_component(mut self, name: impl Into<String>, config: StyleConfig) -> Self {
        self.components.insert(name.into(), config);
        self
    }

    /// Set the root strategy.
    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn component(&self, name: &str) -> Option<&StyleConfig> {
        self.components.get(name)
    }

    /// Component names in file order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Root strategy, inherited by every component.
    pub fn strategy(&self) -> Option<MergeStrategy> {
        self.strategy
    }

    pub fn source(&self) -> Option<&ConfigSource> {
        self.source.as_ref()
    }
}

/// Store the process-wide configuration. Only the first call succeeds.
pub fn install(config: GlobalConfig) -> Result<(), ConfigError> {
    INSTALLED
        .set(config)
        .map_err(|_| ConfigError::AlreadyInstalled)
}

/// The process-wide configuration, if installed.
pub fn current() -> GlobalHandle {
    match INSTALLED.get() {
        Some(config) => GlobalHandle::Loaded(config),
        None => GlobalHandle::NotLoaded,
    }
}

impl GlobalHandle {
    pub fn is_loaded(&self) -> bool {
        matches!(self, GlobalHandle::Loaded(_))
    }

    /// The installed configuration, or `None` before `install`.
    pub fn get(self) -> Option<&'static GlobalConfig> {
        match self {
            GlobalHandle::Loaded(config) => Some(config),
            GlobalHandle::NotLoaded => None,
        }
    }
}

/// Read a TOML or JSON file, returning the value and the SHA-256 digest of
/// its raw bytes.
pub fn read_config_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let value = if is_toml {
        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
        toml_to_json(toml_value)
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?
    };

    Ok((value, digest))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
