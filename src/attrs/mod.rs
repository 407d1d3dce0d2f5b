//! Attribute assembly
//!
//! Walks the keys of a component's default configuration and builds one
//! `<key>Attrs` bag per styled element from the merged configuration.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use restyle_classes::{component_token, extends_targets, merge_classes, strip_extends_tokens};

use crate::config::keys::COMPONENT;
use crate::config::value::defaults_of;
use crate::config::{is_reserved_key, StyleConfig, StyleValue};
use crate::diagnostic::{DiagnosticKind, Diagnostics, ExtendsFailure};
use crate::variant::{value_class, VariantProps};

/// Attributes supplied where the component is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    /// Ambient `class` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Pass-through attributes for the top-level element.
    #[serde(default)]
    pub attrs: IndexMap<String, Value>,
}

impl CallSite {
    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }
}

/// Assembly options
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Key receiving the call-site attributes (default: first style key)
    pub top_level_key: Option<String>,

    /// Keys that never get a bag
    pub exclude: Vec<String>,

    /// Emit bags for keys styled by a nested component
    pub include_nested: bool,

    /// Add `data-*` markers naming the component and key
    pub debug: bool,
}

/// Debug-only markers identifying where a bag came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugMarkers {
    #[serde(rename = "data-component")]
    pub component: String,

    #[serde(rename = "data-key")]
    pub key: String,

    #[serde(rename = "data-child-component", skip_serializing_if = "Option::is_none")]
    pub child_component: Option<String>,
}

/// Attributes for one rendered element.
///
/// Serializes to a single flat object: `class`, `config`, the spread
/// `defaults`, pass-through attributes and debug markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAttributes {
    pub class: String,

    /// Merged value at the key
    pub config: Value,

    #[serde(flatten)]
    pub defaults: Map<String, Value>,

    #[serde(flatten)]
    pub passthrough: IndexMap<String, Value>,

    #[serde(flatten)]
    pub debug: Option<DebugMarkers>,
}

/// Bags keyed by `<key>Attrs`, in default-config key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet(IndexMap<String, ResolvedAttributes>);

impl AttributeSet {
    /// Bag for a style key (`wrapper` looks up `wrapperAttrs`).
    pub fn for_key(&self, key: &str) -> Option<&ResolvedAttributes> {
        self.0.get(&bag_name(key))
    }

    /// Bag names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedAttributes)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Name of the bag for a style key.
pub fn bag_name(key: &str) -> String {
    format!("{}Attrs", key)
}

/// Name of the child component styling a value, if any.
///
/// A class leaf with a `{Name}` token, or a node whose `component` field or
/// `base` carries one.
pub fn nested_component(value: &StyleValue) -> Option<String> {
    match value {
        StyleValue::Component(r) => Some(r.name.clone()),
        StyleValue::Variant(_) | StyleValue::Tree(_) => {
            let config = value.as_config()?;
            match config.get(COMPONENT) {
                Some(StyleValue::Raw(Value::String(s))) => {
                    component_token(s).map(str::to_string)
                }
                _ => match config.get("base") {
                    Some(StyleValue::Component(r)) => Some(r.name.clone()),
                    _ => None,
                },
            }
        }
        _ => None,
    }
}

/// One assembly pass over a merged configuration.
///
/// Extended keys are resolved at most once per pass.
pub struct AttributeAssembler<'a> {
    component: &'a str,
    default: &'a StyleConfig,
    merged: &'a StyleConfig,
    props: &'a VariantProps,
    resolved: HashMap<String, String>,
    in_progress: Vec<String>,
}

impl<'a> AttributeAssembler<'a> {
    pub fn new(
        component: &'a str,
        default: &'a StyleConfig,
        merged: &'a StyleConfig,
        props: &'a VariantProps,
    ) -> Self {
        Self {
            component,
            default,
            merged,
            props,
            resolved: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Build every bag.
    pub fn assemble(
        &mut self,
        call_site: &CallSite,
        options: &AssembleOptions,
        diagnostics: &mut Diagnostics,
    ) -> AttributeSet {
        let default = self.default;
        let top_level = options
            .top_level_key
            .as_deref()
            .or_else(|| default.keys().find(|key| !is_reserved_key(key)));

        let mut bags = IndexMap::new();

        for key in default.keys() {
            if is_reserved_key(key) || options.exclude.iter().any(|e| e == key) {
                continue;
            }
            let Some(value) = self.value_of(key) else {
                continue;
            };

            let is_top = top_level == Some(key);
            let child = nested_component(value);
            if child.is_some() && !is_top && !options.include_nested {
                tracing::trace!(key = %key, "skipping key styled by nested component");
                continue;
            }

            let mut class = self.resolve_class(key, diagnostics);
            let mut passthrough = IndexMap::new();
            if is_top {
                class = merge_classes([Some(class.as_str()), call_site.class.as_deref()]);
                passthrough.extend(
                    call_site
                        .attrs
                        .iter()
                        .filter(|(name, _)| name.as_str() != "class")
                        .map(|(name, v)| (name.clone(), v.clone())),
                );
            }

            let defaults = value
                .as_config()
                .and_then(defaults_of)
                .cloned()
                .unwrap_or_default();

            let debug = options.debug.then(|| DebugMarkers {
                component: self.component.to_string(),
                key: key.to_string(),
                child_component: child,
            });

            bags.insert(
                bag_name(key),
                ResolvedAttributes {
                    class,
                    config: value.to_json(),
                    defaults,
                    passthrough,
                    debug,
                },
            );
        }

        AttributeSet(bags)
    }

    /// Merged value at a key, falling back to the default.
    fn value_of(&self, key: &str) -> Option<&'a StyleValue> {
        self.merged.get(key).or_else(|| self.default.get(key))
    }

    /// Resolved class of a key with its extends references expanded.
    ///
    /// Results are memoized for the pass. Inside a cycle the edge that closes
    /// it is dropped, so the key resolved first keeps the classes of the
    /// others while the last key of the cycle keeps only its own. `assemble`
    /// resolves keys in default-tree order, which makes the outcome
    /// deterministic for a given configuration.
    pub fn resolve_class(&mut self, key: &str, diagnostics: &mut Diagnostics) -> String {
        if let Some(class) = self.resolved.get(key) {
            return class.clone();
        }

        let own = self
            .value_of(key)
            .map(|value| value_class(value, self.props))
            .unwrap_or_default();
        let targets: Vec<String> = extends_targets(&own).into_iter().map(str::to_string).collect();
        if targets.is_empty() {
            self.resolved.insert(key.to_string(), own.clone());
            return own;
        }

        self.in_progress.push(key.to_string());
        let mut parts: Vec<String> = Vec::with_capacity(targets.len() + 1);
        for target in targets {
            let failure = if is_reserved_key(&target) || self.value_of(&target).is_none() {
                Some(ExtendsFailure::Unknown)
            } else if self.in_progress.contains(&target) {
                Some(ExtendsFailure::Cycle)
            } else {
                None
            };

            match failure {
                Some(reason) => diagnostics.record(
                    key,
                    DiagnosticKind::BrokenExtends {
                        key: key.to_string(),
                        target,
                        reason,
                    },
                ),
                None => {
                    let class = self.resolve_class(&target, diagnostics);
                    parts.push(class);
                }
            }
        }
        self.in_progress.pop();

        parts.push(strip_extends_tokens(&own));
        let class = merge_classes(parts.iter().map(|part| Some(part.as_str())));
        self.resolved.insert(key.to_string(), class.clone());
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> StyleConfig {
        StyleConfig::from_json(&value).unwrap()
    }

    fn assemble(
        default: &StyleConfig,
        call_site: &CallSite,
        options: &AssembleOptions,
    ) -> (AttributeSet, Diagnostics) {
        let props = VariantProps::new();
        let mut diagnostics = Diagnostics::for_component("UCard");
        let attrs = AttributeAssembler::new("UCard", default, default, &props).assemble(
            call_site,
            options,
            &mut diagnostics,
        );
        (attrs, diagnostics)
    }

    #[test]
    fn test_bag_per_style_key() {
        let default = config(json!({
            "wrapper": "rounded-lg p-4",
            "header": {"base": "px-4", "defaults": {"as": "h2"}},
            "strategy": "merge",
            "enterTransition": "duration-200",
            "i18n": {"close": "Close"}
        }));
        let (attrs, diagnostics) = assemble(&default, &CallSite::default(), &AssembleOptions::default());

        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["wrapperAttrs", "headerAttrs"]);
        let header = attrs.for_key("header").unwrap();
        assert_eq!(header.class, "px-4");
        assert_eq!(header.defaults["as"], "h2");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_serializes_flat() {
        let default = config(json!({"header": {"base": "px-4", "defaults": {"as": "h2"}}}));
        let options = AssembleOptions {
            debug: true,
            ..AssembleOptions::default()
        };
        let (attrs, _) = assemble(&default, &CallSite::default(), &options);

        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(
            json,
            json!({
                "headerAttrs": {
                    "class": "px-4",
                    "config": {"base": "px-4", "defaults": {"as": "h2"}},
                    "as": "h2",
                    "data-component": "UCard",
                    "data-key": "header"
                }
            })
        );
    }

    #[test]
    fn test_call_site_goes_to_top_level() {
        let default = config(json!({"wrapper": "p-4 text-sm", "body": "p-2"}));
        let mut call_site = CallSite::with_class("p-6");
        call_site.attrs.insert("id".to_string(), json!("card-1"));
        call_site.attrs.insert("class".to_string(), json!("ignored"));

        let (attrs, _) = assemble(&default, &call_site, &AssembleOptions::default());
        let wrapper = attrs.for_key("wrapper").unwrap();
        assert_eq!(wrapper.class, "text-sm p-6");
        assert_eq!(wrapper.passthrough.get("id"), Some(&json!("card-1")));
        assert!(!wrapper.passthrough.contains_key("class"));
        assert_eq!(attrs.for_key("body").unwrap().class, "p-2");
    }

    #[test]
    fn test_explicit_top_level_key() {
        let default = config(json!({"wrapper": "p-4", "body": "p-2"}));
        let options = AssembleOptions {
            top_level_key: Some("body".to_string()),
            ..AssembleOptions::default()
        };
        let (attrs, _) = assemble(&default, &CallSite::with_class("p-3"), &options);
        assert_eq!(attrs.for_key("wrapper").unwrap().class, "p-4");
        assert_eq!(attrs.for_key("body").unwrap().class, "p-3");
    }

    #[test]
    fn test_nested_components_skipped() {
        let default = config(json!({
            "wrapper": "p-4",
            "close": "{UButton} ms-auto",
            "icon": {"component": "{UIcon}", "base": "w-4"}
        }));
        let (attrs, _) = assemble(&default, &CallSite::default(), &AssembleOptions::default());
        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["wrapperAttrs"]);

        let options = AssembleOptions {
            include_nested: true,
            debug: true,
            ..AssembleOptions::default()
        };
        let (attrs, _) = assemble(&default, &CallSite::default(), &options);
        let close = attrs.for_key("close").unwrap();
        assert_eq!(close.class, "ms-auto");
        assert_eq!(
            close.debug.as_ref().unwrap().child_component.as_deref(),
            Some("UButton")
        );
        assert_eq!(
            attrs.for_key("icon").unwrap().debug.as_ref().unwrap().child_component.as_deref(),
            Some("UIcon")
        );
    }

    #[test]
    fn test_nested_top_level_kept() {
        let default = config(json!({"root": "{UButton} w-full", "label": "truncate"}));
        let (attrs, _) = assemble(&default, &CallSite::default(), &AssembleOptions::default());
        assert_eq!(attrs.for_key("root").unwrap().class, "w-full");
    }

    #[test]
    fn test_exclude() {
        let default = config(json!({"wrapper": "p-4", "footer": "p-2"}));
        let options = AssembleOptions {
            exclude: vec!["footer".to_string()],
            ..AssembleOptions::default()
        };
        let (attrs, _) = assemble(&default, &CallSite::default(), &options);
        assert!(attrs.for_key("footer").is_none());
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_extends_prepends_target() {
        let default = config(json!({
            "item": "flex items-center gap-2 px-2 text-sm",
            "activeItem": "{>item} px-3 text-primary-500"
        }));
        let (attrs, diagnostics) =
            assemble(&default, &CallSite::default(), &AssembleOptions::default());
        assert_eq!(
            attrs.for_key("activeItem").unwrap().class,
            "flex items-center gap-2 text-sm px-3 text-primary-500"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_extends_resolved_once() {
        let default = config(json!({"a": "p-2", "b": "{>a} m-1"}));
        let props = VariantProps::new();
        let mut diagnostics = Diagnostics::new();
        let mut assembler = AttributeAssembler::new("UCard", &default, &default, &props);
        assembler.resolve_class("b", &mut diagnostics);

        assert_eq!(assembler.resolved.get("a").map(String::as_str), Some("p-2"));
        assert_eq!(assembler.resolved.get("b").map(String::as_str), Some("p-2 m-1"));
    }

    #[test]
    fn test_broken_extends_reported() {
        let default = config(json!({
            "a": "{>b} p-2",
            "b": "{>a} m-1",
            "c": "{>missing} {>i18n} text-sm",
            "i18n": {"close": "Close"}
        }));
        let (attrs, diagnostics) =
            assemble(&default, &CallSite::default(), &AssembleOptions::default());

        assert_eq!(attrs.for_key("a").unwrap().class, "m-1 p-2");
        assert_eq!(attrs.for_key("b").unwrap().class, "m-1");
        assert_eq!(attrs.for_key("c").unwrap().class, "text-sm");
        assert_eq!(
            diagnostics.codes(),
            vec![
                "BROKEN_EXTENDS:b->a:cycle",
                "BROKEN_EXTENDS:c->missing:unknown",
                "BROKEN_EXTENDS:c->i18n:unknown",
            ]
        );
    }

    #[test]
    fn test_extends_cycle_follows_default_key_order() {
        let default = config(json!({
            "b": "{>a} m-1",
            "a": "{>b} p-2"
        }));
        let (attrs, diagnostics) =
            assemble(&default, &CallSite::default(), &AssembleOptions::default());

        assert_eq!(attrs.for_key("b").unwrap().class, "p-2 m-1");
        assert_eq!(attrs.for_key("a").unwrap().class, "p-2");
        assert_eq!(diagnostics.codes(), vec!["BROKEN_EXTENDS:a->b:cycle"]);
    }

    #[test]
    fn test_variant_values_resolved() {
        let default = config(json!({
            "wrapper": {
                "base": "rounded",
                "variants": {"size": {"sm": "p-1", "lg": "p-4"}},
                "defaultVariants": {"size": "sm"}
            }
        }));
        let props = VariantProps::new().with("size", "lg");
        let mut diagnostics = Diagnostics::new();
        let attrs = AttributeAssembler::new("UCard", &default, &default, &props).assemble(
            &CallSite::default(),
            &AssembleOptions::default(),
            &mut diagnostics,
        );
        assert_eq!(attrs.for_key("wrapper").unwrap().class, "rounded p-4");
    }
}
