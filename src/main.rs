//! restyle CLI
//!
//! Runs a merge or an attribute assembly from configuration files on disk
//! and prints the result as JSON.

use clap::{Args, Parser, Subcommand};
use restyle::attrs::{AssembleOptions, CallSite};
use restyle::config::global::read_config_file;
use restyle::{
    compute, merge_component, ConfigError, GlobalConfig, RenderInputs, StyleConfig, VariantProps,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "restyle")]
#[command(about = "Resolve layered component style configuration", version)]
struct Cli {
    /// Log filter directives (e.g. "warn", "restyle=debug")
    #[arg(long, env = "RESTYLE_LOG", default_value = "warn", global = true)]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge default, global and instance configuration
    Merge {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Merge, then assemble per-element attribute bags
    Attrs {
        #[command(flatten)]
        input: InputArgs,

        /// Active variant value, repeatable (e.g. --variant size=lg)
        #[arg(long = "variant", value_name = "NAME=VALUE", value_parser = parse_variant)]
        variants: Vec<(String, Value)>,

        /// Call-site class attribute
        #[arg(long)]
        class: Option<String>,

        /// Key receiving the call-site class (default: first style key)
        #[arg(long = "top-level")]
        top_level: Option<String>,

        /// Keys to leave out (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Also emit bags for keys styled by nested components
        #[arg(long)]
        include_nested: bool,

        /// Add data-component / data-key markers
        #[arg(long)]
        debug: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Component default configuration (JSON or TOML)
    #[arg(long = "default", short = 'd')]
    default: PathBuf,

    /// Global configuration file with a `components` table
    #[arg(long, short = 'g')]
    global: Option<PathBuf>,

    /// Instance configuration (JSON or TOML)
    #[arg(long, short = 'i')]
    instance: Option<PathBuf>,

    /// Component name used to look up global overrides
    #[arg(long, short = 'c', default_value = "Component")]
    component: String,
}

struct LoadedInputs {
    default: StyleConfig,
    global: GlobalConfig,
    instance: StyleConfig,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let output = match run(cli.command) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run(command: Commands) -> Result<Value, ConfigError> {
    match command {
        Commands::Merge { input } => {
            let loaded = load_inputs(&input)?;
            let merged = merge_component(
                &input.component,
                &loaded.default,
                &loaded.global,
                &loaded.instance,
            );
            Ok(json!({
                "component": input.component,
                "strategy": merged.strategy,
                "config": merged.config,
                "diagnostics": merged.diagnostics,
            }))
        }
        Commands::Attrs {
            input,
            variants,
            class,
            top_level,
            exclude,
            include_nested,
            debug,
        } => {
            let loaded = load_inputs(&input)?;
            let inputs = RenderInputs::new(&input.component, &loaded.default, &loaded.global)
                .with_instance(loaded.instance)
                .with_props(variants.into_iter().collect::<VariantProps>())
                .with_call_site(CallSite {
                    class,
                    ..CallSite::default()
                })
                .with_options(AssembleOptions {
                    top_level_key: top_level,
                    exclude,
                    include_nested,
                    debug,
                });

            let output = compute(&inputs);
            Ok(json!({
                "component": input.component,
                "attrs": output.attrs,
                "diagnostics": output.diagnostics,
            }))
        }
    }
}

fn load_inputs(input: &InputArgs) -> Result<LoadedInputs, ConfigError> {
    let default = load_style_file(&input.default)?;
    let instance = match &input.instance {
        Some(path) => load_style_file(path)?,
        None => StyleConfig::new(),
    };
    let global = match &input.global {
        Some(path) => GlobalConfig::load(path)?,
        None => GlobalConfig::empty(),
    };

    Ok(LoadedInputs {
        default,
        global,
        instance,
    })
}

fn load_style_file(path: &Path) -> Result<StyleConfig, ConfigError> {
    let (value, _digest) = read_config_file(path)?;
    StyleConfig::from_json(&value)
        .map_err(|e| ConfigError::ShapeError(format!("{}: {}", path.display(), e)))
}

/// Parse `name=value`. `true`/`false`/`null` and integers keep their JSON type.
fn parse_variant(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", s))?;
    if name.is_empty() {
        return Err(format!("missing variant name in `{}`", s));
    }

    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => match raw.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(raw.to_string()),
        },
    };
    Ok((name.to_string(), value))
}

fn init_tracing(directives: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_types() {
        assert_eq!(parse_variant("size=lg").unwrap(), ("size".to_string(), json!("lg")));
        assert_eq!(parse_variant("block=true").unwrap(), ("block".to_string(), json!(true)));
        assert_eq!(parse_variant("level=2").unwrap(), ("level".to_string(), json!(2)));
        assert_eq!(parse_variant("color=null").unwrap(), ("color".to_string(), Value::Null));
        assert_eq!(parse_variant("ratio=a=b").unwrap(), ("ratio".to_string(), json!("a=b")));
    }

    #[test]
    fn test_parse_variant_rejects_malformed() {
        assert!(parse_variant("size").is_err());
        assert!(parse_variant("=lg").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "restyle",
            "attrs",
            "--default",
            "button.json",
            "--variant",
            "size=sm",
            "--variant",
            "disabled=true",
            "--exclude",
            "icon,label",
        ])
        .unwrap();
        match cli.command {
            Commands::Attrs {
                input,
                variants,
                exclude,
                ..
            } => {
                assert_eq!(input.component, "Component");
                assert_eq!(variants.len(), 2);
                assert_eq!(exclude, vec!["icon", "label"]);
            }
            Commands::Merge { .. } => panic!("expected attrs"),
        }
    }
}
