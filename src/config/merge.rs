//! Three-layer style tree merge
//!
//! Merges default, global and instance trees key by key:
//! - Reserved keys: per-key rules (see `merge_reserved`)
//! - Object nodes: recurse, wrapping bare class strings into `{ base }`
//! - Class leaves: conflict-aware class merge, or first defined under
//!   `replace`/`overwrite`
//! - `null`: explicit empty, skipped by first-defined lookups

use std::borrow::Cow;

use serde_json::{Map, Value};

use restyle_classes::merge_classes;

use super::compound::merge_compound_variants;
use super::keys::{ReservedKey, VARIANTS};
use super::strategy::{node_strategy, select, MergeStrategy};
use super::value::{ComponentRef, StyleConfig, StyleValue};
use crate::diagnostic::{DiagnosticKind, Diagnostics, Layer};

/// Where in the tree a merge step runs.
#[derive(Debug, Clone, Default)]
pub struct MergeContext {
    /// Strategy of the enclosing node, used when a node sets none itself.
    pub strategy: Option<MergeStrategy>,

    /// Set once the merge has descended into a `variants` sub-tree.
    pub is_variants: bool,

    /// Dot-separated path of the node being merged.
    pub path: String,
}

/// Result of a tree merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTree {
    pub config: StyleConfig,

    /// Strategy applied at the root node.
    pub strategy: MergeStrategy,
}

impl MergeContext {
    /// Root context inheriting the global configuration's strategy.
    pub fn root(inherited: Option<MergeStrategy>) -> Self {
        Self {
            strategy: inherited,
            ..Self::default()
        }
    }

    fn child(&self, key: &str, strategy: MergeStrategy) -> Self {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };
        Self {
            strategy: Some(strategy),
            is_variants: self.is_variants || key == VARIANTS,
            path,
        }
    }
}

/// Merge three trees from the root.
///
/// `inherited` is the strategy set at the root of the global configuration
/// file; a node's own `strategy` keys take precedence over it.
pub fn merge_configs(
    default: &StyleConfig,
    global: &StyleConfig,
    instance: &StyleConfig,
    inherited: Option<MergeStrategy>,
    diagnostics: &mut Diagnostics,
) -> MergedTree {
    merge_tree(
        default,
        global,
        instance,
        &MergeContext::root(inherited),
        diagnostics,
    )
}

/// Merge three trees at an arbitrary position.
pub fn merge_tree(
    default: &StyleConfig,
    global: &StyleConfig,
    instance: &StyleConfig,
    cx: &MergeContext,
    diagnostics: &mut Diagnostics,
) -> MergedTree {
    // Nothing overrides the default
    if global.is_empty() && instance.is_empty() {
        let strategy = select(
            None,
            None,
            node_strategy(default, Layer::Default, &cx.path, diagnostics),
            cx.strategy,
        );
        return MergedTree {
            config: default.clone(),
            strategy,
        };
    }

    let strategy = select(
        node_strategy(instance, Layer::Instance, &cx.path, diagnostics),
        node_strategy(global, Layer::Global, &cx.path, diagnostics),
        node_strategy(default, Layer::Default, &cx.path, diagnostics),
        cx.strategy,
    );

    let layers = Layers {
        default,
        global,
        instance,
    };
    let config = merge_entries(&layers, strategy, cx, diagnostics);

    MergedTree { config, strategy }
}

struct Layers<'a> {
    default: &'a StyleConfig,
    global: &'a StyleConfig,
    instance: &'a StyleConfig,
}

impl<'a> Layers<'a> {
    /// Default order, then global-only keys, then instance-only keys.
    fn composed_keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = self.default.keys().collect();
        keys.extend(
            self.global
                .keys()
                .filter(|key| !self.default.contains_key(key)),
        );
        keys.extend(self.instance.keys().filter(|key| {
            !self.default.contains_key(key) && !self.global.contains_key(key)
        }));
        keys
    }
}

fn merge_entries(
    layers: &Layers<'_>,
    strategy: MergeStrategy,
    cx: &MergeContext,
    diagnostics: &mut Diagnostics,
) -> StyleConfig {
    let mut merged = StyleConfig::new();

    for key in layers.composed_keys() {
        let d = layers.default.get(key);
        let g = layers.global.get(key);
        let i = layers.instance.get(key);

        let value = match ReservedKey::classify(key) {
            Some(reserved) => merge_reserved(key, reserved, [d, g, i], strategy, cx, diagnostics),
            None => merge_style_key(key, [d, g, i], strategy, cx, diagnostics),
        };

        if let Some(value) = value {
            merged.insert(key, value);
        }
    }

    merged
}

/// Combine a reserved key. `sources` is `[default, global, instance]`.
fn merge_reserved(
    key: &str,
    reserved: ReservedKey,
    sources: [Option<&StyleValue>; 3],
    strategy: MergeStrategy,
    cx: &MergeContext,
    diagnostics: &mut Diagnostics,
) -> Option<StyleValue> {
    let [d, g, i] = sources;

    if reserved.is_instance_forbidden() && i.is_some() {
        diagnostics.record(
            &cx.path,
            DiagnosticKind::DisallowedOverride {
                key: key.to_string(),
                layer: Layer::Instance,
            },
        );
    }
    if reserved.is_global_forbidden() && g.is_some() {
        diagnostics.record(
            &cx.path,
            DiagnosticKind::DisallowedOverride {
                key: key.to_string(),
                layer: Layer::Global,
            },
        );
    }

    match reserved {
        ReservedKey::Safelist | ReservedKey::SafelistColors => first_defined([g, d]),
        ReservedKey::Component => first_defined([i, d]),
        ReservedKey::Strategy | ReservedKey::I18n | ReservedKey::Transition => {
            first_defined([i, g, d])
        }
        ReservedKey::Defaults | ReservedKey::DefaultVariants => {
            shallow_merge(key, sources, &cx.path, diagnostics)
        }
        ReservedKey::CompoundVariants => Some(merge_compound_variants(
            d,
            g,
            i,
            strategy,
            &cx.path,
            diagnostics,
        )),
    }
}

/// Combine an ordinary style key. `sources` is `[default, global, instance]`.
fn merge_style_key(
    key: &str,
    sources: [Option<&StyleValue>; 3],
    strategy: MergeStrategy,
    cx: &MergeContext,
    diagnostics: &mut Diagnostics,
) -> Option<StyleValue> {
    let [d, g, i] = sources;

    if strategy == MergeStrategy::Overwrite {
        return first_defined([i, g, d]);
    }

    if sources.iter().flatten().any(|v| v.is_node()) {
        let child = cx.child(key, strategy);
        let wrap = !child.is_variants;
        let merged = merge_tree(
            &as_subtree(d, wrap),
            &as_subtree(g, wrap),
            &as_subtree(i, wrap),
            &child,
            diagnostics,
        );
        return Some(StyleValue::from_config(merged.config));
    }

    if strategy.first_defined_wins() || !sources.iter().flatten().any(|v| v.is_class_leaf()) {
        return first_defined([i, g, d]);
    }

    Some(merge_leaf_classes(d, g, i))
}

/// Class merge of three leaves, keeping the highest-priority component reference.
fn merge_leaf_classes(
    d: Option<&StyleValue>,
    g: Option<&StyleValue>,
    i: Option<&StyleValue>,
) -> StyleValue {
    let class = merge_classes([d, g, i].map(|v| v.and_then(StyleValue::class_str)));

    let name = [i, g, d].into_iter().flatten().find_map(|v| match v {
        StyleValue::Component(r) => Some(r.name.clone()),
        _ => None,
    });

    match name {
        Some(name) => StyleValue::Component(ComponentRef { name, class }),
        None => StyleValue::Class(class),
    }
}

/// View a source as a sub-tree for recursion.
///
/// Class leaves become `{ base: leaf }` when `wrap` is set; everything else
/// that is not a node counts as absent.
fn as_subtree(value: Option<&StyleValue>, wrap: bool) -> Cow<'_, StyleConfig> {
    match value {
        Some(v) if v.is_node() => match v.as_config() {
            Some(config) => Cow::Borrowed(config),
            None => Cow::Owned(StyleConfig::new()),
        },
        Some(v) if wrap && v.is_class_leaf() => {
            let mut config = StyleConfig::new();
            config.insert("base", v.clone());
            Cow::Owned(config)
        }
        _ => Cow::Owned(StyleConfig::new()),
    }
}

/// First non-`null` value in priority order.
///
/// `Some(Empty)` when every present value is `null`; `None` when no source
/// has the key at all.
fn first_defined<const N: usize>(sources: [Option<&StyleValue>; N]) -> Option<StyleValue> {
    let mut present = sources.into_iter().flatten().peekable();
    present.peek()?;
    Some(
        present
            .find(|v| !v.is_empty())
            .cloned()
            .unwrap_or(StyleValue::Empty),
    )
}

/// Key-by-key object merge, later layers overriding earlier ones.
fn shallow_merge(
    key: &str,
    sources: [Option<&StyleValue>; 3],
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<StyleValue> {
    let layers = [Layer::Default, Layer::Global, Layer::Instance];
    let mut merged: Option<Map<String, Value>> = None;

    for (layer, source) in layers.into_iter().zip(sources) {
        match source {
            None | Some(StyleValue::Empty) => {}
            Some(StyleValue::Raw(Value::Object(map))) => {
                let target = merged.get_or_insert_with(Map::new);
                for (k, v) in map {
                    target.insert(k.clone(), v.clone());
                }
            }
            Some(_) => diagnostics.record(
                path,
                DiagnosticKind::MalformedShape {
                    key: key.to_string(),
                    layer,
                    expected: "an object".to_string(),
                },
            ),
        }
    }

    match merged {
        Some(map) => Some(StyleValue::Raw(Value::Object(map))),
        None => {
            let [d, g, i] = sources;
            first_defined([i, g, d])
        }
    }
}
