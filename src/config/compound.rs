//! Compound variant rule merging
//!
//! Rules from the three layers are matched by predicate. A default rule
//! absorbs at most one matching rule from each overriding layer; rules that
//! match nothing are appended after the default rules.

use serde_json::{Map, Value};

use restyle_classes::merge_classes;

use super::keys::COMPOUND_VARIANTS;
use super::strategy::MergeStrategy;
use super::value::{json_type, StyleValue};
use crate::diagnostic::{DiagnosticKind, Diagnostics, Layer};

type Rule = Map<String, Value>;

/// Keys holding a rule's class rather than part of its predicate.
const CLASS_KEYS: &[&str] = &["class", "className"];

/// Merge the `compoundVariants` values of one node.
///
/// All-`null` input stays `null`; otherwise the result is an array.
pub fn merge_compound_variants(
    default: Option<&StyleValue>,
    global: Option<&StyleValue>,
    instance: Option<&StyleValue>,
    strategy: MergeStrategy,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> StyleValue {
    let all_empty = [default, global, instance]
        .iter()
        .all(|v| v.map_or(true, StyleValue::is_empty));
    if all_empty {
        return StyleValue::Empty;
    }

    let defaults = rule_pool(default, Layer::Default, path, diagnostics);
    let mut globals = rule_pool(global, Layer::Global, path, diagnostics);
    let mut instances = rule_pool(instance, Layer::Instance, path, diagnostics);

    let mut merged: Vec<Rule> = Vec::with_capacity(defaults.len() + globals.len() + instances.len());

    for rule in defaults {
        let from_global = take_match(&mut globals, &rule);
        let from_instance = take_match(&mut instances, &rule);

        if from_global.is_none() && from_instance.is_none() {
            merged.push(rule);
            continue;
        }

        let class = combine_class(
            rule_class(&rule),
            from_global.as_ref().and_then(rule_class),
            from_instance.as_ref().and_then(rule_class),
            strategy,
        );
        merged.push(with_class(rule, class));
    }

    // A leftover may repeat the predicate of any rule emitted so far
    for rule in globals.into_iter().chain(instances) {
        push_or_combine(&mut merged, rule, strategy);
    }

    StyleValue::Raw(Value::Array(merged.into_iter().map(Value::Object).collect()))
}

/// Structural predicate equality.
///
/// Class keys and `null`-valued keys are ignored. Arrays compare as sets.
/// A key present on only one side makes the predicates unequal.
pub fn predicates_equal(a: &Rule, b: &Rule) -> bool {
    let a_keys: Vec<&String> = predicate_keys(a).collect();
    let b_count = predicate_keys(b).count();
    if a_keys.len() != b_count {
        return false;
    }

    a_keys.into_iter().all(|key| match (a.get(key), b.get(key)) {
        (Some(x), Some(y)) if !y.is_null() => values_equal(x, y),
        _ => false,
    })
}

/// The class of a rule: `class`, falling back to `className`.
pub fn rule_class(rule: &Rule) -> Option<&str> {
    CLASS_KEYS
        .iter()
        .filter_map(|key| rule.get(*key).and_then(Value::as_str))
        .find(|class| !class.trim().is_empty())
}

/// Predicate entries of a rule.
pub fn predicate(rule: &Rule) -> impl Iterator<Item = (&String, &Value)> {
    rule.iter()
        .filter(|(key, value)| !CLASS_KEYS.contains(&key.as_str()) && !value.is_null())
}

fn predicate_keys(rule: &Rule) -> impl Iterator<Item = &String> {
    predicate(rule).map(|(key, _)| key)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(xs), Value::Array(ys)) => {
            xs.iter().all(|x| ys.contains(x)) && ys.iter().all(|y| xs.contains(y))
        }
        _ => a == b,
    }
}

/// Collect the object rules of one layer.
fn rule_pool(
    value: Option<&StyleValue>,
    layer: Layer,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<Rule> {
    let rules = match value {
        None | Some(StyleValue::Empty) => return Vec::new(),
        Some(StyleValue::Raw(Value::Array(rules))) => rules,
        Some(other) => {
            tracing::debug!(
                layer = %layer,
                found = json_type(&other.to_json()),
                "compoundVariants is not an array"
            );
            diagnostics.record(
                path,
                DiagnosticKind::MalformedShape {
                    key: COMPOUND_VARIANTS.to_string(),
                    layer,
                    expected: "an array".to_string(),
                },
            );
            return Vec::new();
        }
    };

    let mut pool = Vec::with_capacity(rules.len());
    for rule in rules {
        match rule {
            Value::Object(map) => pool.push(map.clone()),
            _ => diagnostics.record(
                path,
                DiagnosticKind::MalformedShape {
                    key: COMPOUND_VARIANTS.to_string(),
                    layer,
                    expected: "an array of objects".to_string(),
                },
            ),
        }
    }
    pool
}

/// Remove and return the first rule in `pool` whose predicate equals `rule`'s.
fn take_match(pool: &mut Vec<Rule>, rule: &Rule) -> Option<Rule> {
    let index = pool.iter().position(|candidate| predicates_equal(rule, candidate))?;
    Some(pool.remove(index))
}

fn combine_class(
    default: Option<&str>,
    global: Option<&str>,
    instance: Option<&str>,
    strategy: MergeStrategy,
) -> String {
    if strategy.first_defined_wins() {
        instance.or(global).or(default).unwrap_or_default().to_string()
    } else {
        merge_classes([default, global, instance])
    }
}

fn with_class(mut rule: Rule, class: String) -> Rule {
    rule.remove("className");
    rule.insert("class".to_string(), Value::String(class));
    rule
}

/// Fold `rule` into the first emitted rule with an equal predicate, or append it.
fn push_or_combine(merged: &mut Vec<Rule>, rule: Rule, strategy: MergeStrategy) {
    let existing = merged
        .iter()
        .position(|candidate| predicates_equal(candidate, &rule));

    match existing {
        Some(index) => {
            let earlier = merged.remove(index);
            let class = combine_class(rule_class(&earlier), None, rule_class(&rule), strategy);
            merged.insert(index, with_class(earlier, class));
        }
        None => merged.push(rule),
    }
}
