//! Variant resolution
//!
//! Turns a merged variant node plus the active variant values into one
//! class string: `base`, then one entry per variant dimension, then every
//! satisfied compound rule, all passed once through the class merger.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use restyle_classes::merge_classes;

use crate::config::compound::{predicate, rule_class};
use crate::config::{StyleValue, VariantNode};

/// Active variant values: component props plus derived state such as
/// `open`, `error` or `disabled`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantProps(IndexMap<String, Value>);

impl VariantProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in effect for a node: its `defaultVariants` overlaid by every
    /// non-`null` active value.
    pub fn effective(&self, defaults: Option<&Map<String, Value>>) -> IndexMap<String, Value> {
        let mut effective: IndexMap<String, Value> = defaults
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in &self.0 {
            if !value.is_null() {
                effective.insert(name.clone(), value.clone());
            }
        }
        effective
    }
}

impl FromIterator<(String, Value)> for VariantProps {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Key a value selects in a variant dimension.
///
/// Strings select themselves, booleans `"true"`/`"false"`, numbers their
/// JSON text. Nothing else selects a variant.
pub fn variant_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve a variant node to its final class string.
pub fn resolve_variant_classes(node: &VariantNode, props: &VariantProps) -> String {
    let effective = props.effective(node.default_variants());
    let mut parts: Vec<String> = Vec::new();

    if let Some(base) = node.base() {
        parts.push(value_class(base, props));
    }

    if let Some(dimensions) = node.variants() {
        for (dimension, entries) in dimensions.iter() {
            let Some(entries) = entries.as_config() else {
                continue;
            };
            let selected = effective
                .get(dimension)
                .and_then(variant_key)
                .and_then(|key| entries.get(&key));
            if let Some(entry) = selected {
                parts.push(value_class(entry, props));
            }
        }
    }

    for rule in node.compound_variants() {
        if rule_satisfied(rule, &effective) {
            if let Some(class) = rule_class(rule) {
                parts.push(class.to_string());
            }
        }
    }

    merge_classes(parts.iter().map(|part| Some(part.as_str())))
}

/// Class contribution of any merged value.
///
/// Class strings give their classes, variant nodes are resolved, and trees
/// and opaque values contribute nothing.
pub fn value_class(value: &StyleValue, props: &VariantProps) -> String {
    match value {
        StyleValue::Class(s) => s.clone(),
        StyleValue::Component(r) => r.class.clone(),
        StyleValue::Variant(node) => resolve_variant_classes(node, props),
        StyleValue::Empty | StyleValue::Tree(_) | StyleValue::Raw(_) => String::new(),
    }
}

/// Whether every predicate entry of a compound rule holds.
///
/// An array predicate value is satisfied by any of its elements.
fn rule_satisfied(rule: &Map<String, Value>, effective: &IndexMap<String, Value>) -> bool {
    predicate(rule).all(|(name, expected)| {
        let Some(actual) = effective.get(name).and_then(variant_key) else {
            return false;
        };
        match expected {
            Value::Array(options) => options
                .iter()
                .any(|option| variant_key(option).as_deref() == Some(actual.as_str())),
            other => variant_key(other).as_deref() == Some(actual.as_str()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> VariantNode {
        match StyleValue::from_json(&value) {
            StyleValue::Variant(node) => node,
            other => panic!("expected variant node, got {:?}", other),
        }
    }

    fn button() -> VariantNode {
        node(json!({
            "base": "inline-flex items-center rounded-md",
            "variants": {
                "size": {"sm": "px-2 text-xs", "md": "px-3 text-sm", "lg": "px-4 text-base"},
                "block": {"true": "w-full justify-center"},
                "color": {"primary": "bg-primary-500 text-white", "neutral": "bg-gray-100"}
            },
            "compoundVariants": [
                {"color": "primary", "disabled": true, "class": "bg-primary-300"},
                {"size": ["sm", "md"], "block": true, "class": "px-1"}
            ],
            "defaultVariants": {"size": "md", "color": "primary"}
        }))
    }

    #[test]
    fn test_default_variants_apply() {
        let classes = resolve_variant_classes(&button(), &VariantProps::new());
        assert_eq!(
            classes,
            "inline-flex items-center rounded-md px-3 text-sm bg-primary-500 text-white"
        );
    }

    #[test]
    fn test_props_override_defaults() {
        let props = VariantProps::new().with("size", "lg").with("color", "neutral");
        let classes = resolve_variant_classes(&button(), &props);
        assert_eq!(
            classes,
            "inline-flex items-center rounded-md px-4 text-base bg-gray-100"
        );
    }

    #[test]
    fn test_null_prop_keeps_default() {
        let props = VariantProps::new().with("size", Value::Null);
        let classes = resolve_variant_classes(&button(), &props);
        assert!(classes.contains("px-3 text-sm"));
    }

    #[test]
    fn test_boolean_dimension() {
        let props = VariantProps::new().with("block", true);
        let classes = resolve_variant_classes(&button(), &props);
        assert!(classes.contains("w-full justify-center"));
    }

    #[test]
    fn test_compound_rules_append_and_resolve_conflicts() {
        let props = VariantProps::new().with("disabled", true);
        let classes = resolve_variant_classes(&button(), &props);
        assert!(classes.contains("bg-primary-300"));
        assert!(!classes.contains("bg-primary-500"));

        let props = VariantProps::new().with("block", true).with("size", "sm");
        let classes = resolve_variant_classes(&button(), &props);
        assert!(classes.contains("px-1"));
        assert!(!classes.contains("px-2"));
    }

    #[test]
    fn test_compound_array_predicate_any_of() {
        let props = VariantProps::new().with("block", true).with("size", "lg");
        let classes = resolve_variant_classes(&button(), &props);
        assert!(!classes.contains("px-1"));
        assert!(classes.contains("px-4"));
    }

    #[test]
    fn test_nested_variant_entry() {
        let nested = node(json!({
            "base": "p-2",
            "variants": {
                "size": {
                    "sm": {"base": "text-xs", "variants": {"tone": {"soft": "opacity-75"}}}
                }
            }
        }));
        let props = VariantProps::new().with("size", "sm").with("tone", "soft");
        assert_eq!(resolve_variant_classes(&nested, &props), "p-2 text-xs opacity-75");
    }

    #[test]
    fn test_number_keys() {
        let rated = node(json!({"variants": {"level": {"1": "text-sm", "2": "text-lg"}}}));
        let props = VariantProps::new().with("level", 2);
        assert_eq!(resolve_variant_classes(&rated, &props), "text-lg");
    }

    #[test]
    fn test_value_class() {
        let props = VariantProps::new();
        assert_eq!(value_class(&StyleValue::class("{UIcon} w-4"), &props), "w-4");
        assert_eq!(value_class(&StyleValue::Empty, &props), "");
        assert_eq!(value_class(&StyleValue::Raw(json!(3)), &props), "");
    }
}
