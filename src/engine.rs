//! Pure render-time pipeline
//!
//! `compute` is a deterministic function of its inputs; hosts call it again
//! whenever the instance snapshot or the active values change.

use serde::Serialize;

use crate::attrs::{AssembleOptions, AttributeAssembler, AttributeSet, CallSite};
use crate::config::{merge_configs, GlobalConfig, MergeStrategy, StyleConfig};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::variant::VariantProps;

/// Merged configuration of one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merged {
    pub config: StyleConfig,
    pub strategy: MergeStrategy,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything one render of a component depends on.
#[derive(Debug, Clone)]
pub struct RenderInputs<'a> {
    pub component: &'a str,
    pub default: &'a StyleConfig,
    pub global: &'a GlobalConfig,
    pub instance: StyleConfig,
    pub props: VariantProps,
    pub call_site: CallSite,
    pub options: AssembleOptions,
}

/// Result of one render computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub config: StyleConfig,
    pub strategy: MergeStrategy,
    pub attrs: AttributeSet,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> RenderInputs<'a> {
    pub fn new(component: &'a str, default: &'a StyleConfig, global: &'a GlobalConfig) -> Self {
        Self {
            component,
            default,
            global,
            instance: StyleConfig::new(),
            props: VariantProps::new(),
            call_site: CallSite::default(),
            options: AssembleOptions::default(),
        }
    }

    pub fn with_instance(mut self, instance: StyleConfig) -> Self {
        self.instance = instance;
        self
    }

    pub fn with_props(mut self, props: VariantProps) -> Self {
        self.props = props;
        self
    }

    pub fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_site = call_site;
        self
    }

    pub fn with_options(mut self, options: AssembleOptions) -> Self {
        self.options = options;
        self
    }
}

/// Merge one component's default configuration with its global and
/// instance overrides.
pub fn merge_component(
    component: &str,
    default: &StyleConfig,
    global: &GlobalConfig,
    instance: &StyleConfig,
) -> Merged {
    let mut diagnostics = Diagnostics::for_component(component);
    let empty = StyleConfig::new();
    let global_config = global.component(component).unwrap_or(&empty);

    let merged = merge_configs(
        default,
        global_config,
        instance,
        global.strategy(),
        &mut diagnostics,
    );

    tracing::debug!(
        component = %component,
        strategy = %merged.strategy,
        diagnostics = diagnostics.len(),
        "merged style config"
    );

    Merged {
        config: merged.config,
        strategy: merged.strategy,
        diagnostics: diagnostics.into_vec(),
    }
}

/// Run the whole pipeline: merge, then assemble attribute bags.
pub fn compute(inputs: &RenderInputs<'_>) -> RenderOutput {
    let merged = merge_component(inputs.component, inputs.default, inputs.global, &inputs.instance);

    let mut diagnostics = Diagnostics::for_component(inputs.component);
    let attrs = AttributeAssembler::new(
        inputs.component,
        inputs.default,
        &merged.config,
        &inputs.props,
    )
    .assemble(&inputs.call_site, &inputs.options, &mut diagnostics);

    let mut all = merged.diagnostics;
    all.extend(diagnostics.into_vec());

    RenderOutput {
        config: merged.config,
        strategy: merged.strategy,
        attrs,
        diagnostics: all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> StyleConfig {
        StyleConfig::from_json(&value).unwrap()
    }

    #[test]
    fn test_merge_component_uses_global_entry() {
        let default = config(json!({"wrapper": "p-2 text-sm"}));
        let global = GlobalConfig::empty()
            .with_component("UCard", config(json!({"wrapper": "p-4"})))
            .with_component("UButton", config(json!({"wrapper": "p-8"})));

        let merged = merge_component("UCard", &default, &global, &StyleConfig::new());
        assert_eq!(merged.config.to_json(), json!({"wrapper": "text-sm p-4"}));
        assert!(merged.diagnostics.is_empty());
    }

    #[test]
    fn test_global_root_strategy_inherited() {
        let default = config(json!({"wrapper": "p-2 text-sm"}));
        let global = GlobalConfig::empty()
            .with_strategy(MergeStrategy::Replace)
            .with_component("UCard", config(json!({"wrapper": "p-4"})));

        let merged = merge_component("UCard", &default, &global, &StyleConfig::new());
        assert_eq!(merged.strategy, MergeStrategy::Replace);
        assert_eq!(merged.config.to_json(), json!({"wrapper": "p-4"}));
    }

    #[test]
    fn test_compute_end_to_end() {
        let default = config(json!({
            "wrapper": {
                "base": "rounded-lg",
                "variants": {"size": {"sm": "p-2", "lg": "p-6"}},
                "defaultVariants": {"size": "sm"}
            },
            "safelist": ["p-2", "p-6"]
        }));
        let global = GlobalConfig::empty();
        let inputs = RenderInputs::new("UCard", &default, &global)
            .with_instance(config(json!({"safelist": ["p-9"], "wrapper": "shadow"})))
            .with_props(VariantProps::new().with("size", "lg"))
            .with_call_site(CallSite::with_class("ring"));

        let output = compute(&inputs);
        assert_eq!(
            output.attrs.for_key("wrapper").unwrap().class,
            "rounded-lg shadow p-6 ring"
        );
        assert_eq!(output.config.to_json()["safelist"], json!(["p-2", "p-6"]));
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].component.as_deref(), Some("UCard"));
    }

    #[test]
    fn test_compute_is_pure() {
        let default = config(json!({"wrapper": "p-2", "body": "{>wrapper} text-sm"}));
        let global = GlobalConfig::empty();
        let inputs = RenderInputs::new("UCard", &default, &global)
            .with_instance(config(json!({"wrapper": "p-3"})));

        assert_eq!(compute(&inputs), compute(&inputs));
    }
}
