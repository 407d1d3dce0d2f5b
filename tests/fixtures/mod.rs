//! Shared test fixtures
//!
//! - `components/modal.json`: default configuration of a modal component
//! - `global.toml` / `global.json`: project-wide overrides
//! - `instance.json`: per-instance overrides

#![allow(dead_code)]

use restyle::config::global::read_config_file;
use restyle::StyleConfig;
use std::path::{Path, PathBuf};

/// Root of the fixture directory
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn global_toml_path() -> PathBuf {
    fixtures_dir().join("global.toml")
}

pub fn global_json_path() -> PathBuf {
    fixtures_dir().join("global.json")
}

/// Load a style configuration fixture by relative path
pub fn load_style(relative: &str) -> StyleConfig {
    let (value, _) = read_config_file(&fixtures_dir().join(relative))
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", relative, e));
    StyleConfig::from_json(&value).expect("fixture is a style config")
}

pub fn modal_default() -> StyleConfig {
    load_style("components/modal.json")
}

pub fn modal_instance() -> StyleConfig {
    load_style("instance.json")
}
