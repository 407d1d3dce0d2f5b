//! Style configuration tree
//!
//! Configuration arrives as loosely shaped JSON. It is deep-copied into the
//! tagged union below once, at the boundary, so the merge code never has to
//! sniff shapes and never aliases caller-owned values.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use restyle_classes::{component_token, strip_component_tokens};

use super::error::ConfigError;
use super::keys::{is_reserved_key, COMPOUND_VARIANTS, DEFAULTS, DEFAULT_VARIANTS, VARIANT_KEYS};

/// Ordered mapping of style keys to values.
///
/// Iteration order is insertion order; merged trees are built in composed
/// key order (default, then global-only, then instance-only).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleConfig {
    entries: IndexMap<String, StyleValue>,
}

/// A value at a style key.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Explicit `null`: empty, but present.
    Empty,

    /// Class-list string.
    Class(String),

    /// Class-list string carrying a nested component token.
    Component(ComponentRef),

    /// Object with `base`, `variants`, `compoundVariants` or `defaultVariants`.
    Variant(VariantNode),

    /// Any other object.
    Tree(StyleConfig),

    /// Opaque payload (reserved-key values, arrays, numbers, booleans).
    Raw(Value),
}

/// Discriminator for [`StyleValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Empty,
    ClassString,
    NestedComponent,
    Variant,
    SubConfig,
    Raw,
}

/// Reference to a child component that owns the styling of this key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    /// Component name from the `{Name}` token.
    pub name: String,

    /// Remaining classes with the token removed.
    pub class: String,
}

/// A variant-capable style node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantNode(StyleConfig);

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy a JSON object into a style tree.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::ShapeError(format!(
                "style config must be an object, got {}",
                json_type(other)
            ))),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let entries = map
            .iter()
            .map(|(key, value)| {
                let value = if is_reserved_key(key) {
                    StyleValue::raw(value)
                } else {
                    StyleValue::from_json(value)
                };
                (key.clone(), value)
            })
            .collect();
        Self { entries }
    }

    /// Convert back to JSON.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value. A new key goes to the end.
    pub fn insert(&mut self, key: impl Into<String>, value: StyleValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, StyleValue)> for StyleConfig {
    fn from_iter<T: IntoIterator<Item = (String, StyleValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for StyleConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyleConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl StyleValue {
    /// Deep-copy and classify a JSON value at a non-reserved key.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) => Self::class(s),
            Value::Object(map) => Self::from_config(StyleConfig::from_map(map)),
            other => Self::Raw(other.clone()),
        }
    }

    /// Build a leaf from a class string, detecting nested component tokens.
    pub fn class(classes: &str) -> Self {
        match component_token(classes) {
            Some(name) => Self::Component(ComponentRef {
                name: name.to_string(),
                class: strip_component_tokens(classes),
            }),
            None => Self::Class(classes.to_string()),
        }
    }

    /// Classify an object node: variant node or plain sub-config.
    pub fn from_config(config: StyleConfig) -> Self {
        if VARIANT_KEYS.iter().any(|key| config.contains_key(key)) {
            Self::Variant(VariantNode(config))
        } else {
            Self::Tree(config)
        }
    }

    fn raw(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            other => Self::Raw(other.clone()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Empty => ValueKind::Empty,
            Self::Class(_) => ValueKind::ClassString,
            Self::Component(_) => ValueKind::NestedComponent,
            Self::Variant(_) => ValueKind::Variant,
            Self::Tree(_) => ValueKind::SubConfig,
            Self::Raw(_) => ValueKind::Raw,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether this value is a node the tree merger recurses into.
    pub fn is_node(&self) -> bool {
        matches!(self, Self::Variant(_) | Self::Tree(_))
    }

    /// Class-list leaves: plain strings and nested component strings.
    pub fn is_class_leaf(&self) -> bool {
        matches!(self, Self::Class(_) | Self::Component(_))
    }

    /// The map behind a variant node or sub-config.
    pub fn as_config(&self) -> Option<&StyleConfig> {
        match self {
            Self::Variant(node) => Some(&node.0),
            Self::Tree(config) => Some(config),
            _ => None,
        }
    }

    /// Class text of a class-list leaf (component token excluded).
    pub fn class_str(&self) -> Option<&str> {
        match self {
            Self::Class(s) => Some(s),
            Self::Component(r) => Some(&r.class),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Class(s) => Value::String(s.clone()),
            Self::Component(r) => Value::String(r.to_class_string()),
            Self::Variant(node) => node.0.to_json(),
            Self::Tree(config) => config.to_json(),
            Self::Raw(value) => value.clone(),
        }
    }
}

impl ComponentRef {
    /// The token followed by the remaining classes, as written in config.
    pub fn to_class_string(&self) -> String {
        if self.class.is_empty() {
            format!("{{{}}}", self.name)
        } else {
            format!("{{{}}} {}", self.name, self.class)
        }
    }
}

impl VariantNode {
    pub fn base(&self) -> Option<&StyleValue> {
        self.0.get("base")
    }

    /// Variant dimensions: `dimension -> { value -> class }`.
    pub fn variants(&self) -> Option<&StyleConfig> {
        self.0.get("variants").and_then(StyleValue::as_config)
    }

    /// Compound rules as JSON objects. Malformed entries are skipped.
    pub fn compound_variants(&self) -> impl Iterator<Item = &Map<String, Value>> {
        let rules = match self.0.get(COMPOUND_VARIANTS) {
            Some(StyleValue::Raw(Value::Array(rules))) => rules.as_slice(),
            _ => &[][..],
        };
        rules.iter().filter_map(Value::as_object)
    }

    pub fn default_variants(&self) -> Option<&Map<String, Value>> {
        match self.0.get(DEFAULT_VARIANTS) {
            Some(StyleValue::Raw(Value::Object(map))) => Some(map),
            _ => None,
        }
    }
}

/// The `defaults` sub-object of a node, if object-shaped.
pub(crate) fn defaults_of(config: &StyleConfig) -> Option<&Map<String, Value>> {
    match config.get(DEFAULTS) {
        Some(StyleValue::Raw(Value::Object(map))) => Some(map),
        _ => None,
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
