//! Global configuration loading tests

mod fixtures;

use restyle::config::global::{self, GlobalHandle};
use restyle::{ConfigError, GlobalConfig, MergeStrategy};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_toml_fixture() {
    let path = fixtures::global_toml_path();
    let config = GlobalConfig::load(&path).unwrap();

    assert_eq!(config.strategy(), None);
    let mut names: Vec<&str> = config.component_names().collect();
    names.sort();
    assert_eq!(names, vec!["UButton", "UModal"]);

    let modal = config.component("UModal").unwrap();
    assert_eq!(modal.to_json()["body"], "p-6");
    assert_eq!(
        modal.to_json()["content"]["compoundVariants"],
        json!([{"class": "max-w-6xl", "fullscreen": false, "size": "lg"}])
    );

    let source = config.source().unwrap();
    assert_eq!(source.path, path.to_string_lossy());
    assert_eq!(source.digest.len(), 64);
    assert!(source.digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_load_json_fixture() {
    let config = GlobalConfig::load(&fixtures::global_json_path()).unwrap();
    assert_eq!(config.strategy(), Some(MergeStrategy::Replace));
    assert_eq!(config.component("UModal").unwrap().to_json(), json!({"body": "p-2"}));
}

#[test]
fn test_digest_is_stable() {
    let path = fixtures::global_toml_path();
    let first = GlobalConfig::load(&path).unwrap();
    let second = GlobalConfig::load(&path).unwrap();
    assert_eq!(first.source(), second.source());

    let other = GlobalConfig::load(&fixtures::global_json_path()).unwrap();
    assert_ne!(first.source().unwrap().digest, other.source().unwrap().digest);
}

#[test]
fn test_load_errors() {
    let err = GlobalConfig::load(&fixtures::fixtures_dir().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));

    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(file, "[components.UModal").unwrap();
    let err = GlobalConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));

    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    write!(file, r#"{{"components": {{"UModal": "p-2"}}}}"#).unwrap();
    let err = GlobalConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ShapeError(_)));
}

#[test]
fn test_load_or_empty_fallback() {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    write!(file, r#"{{"strategy": "sometimes"}}"#).unwrap();

    let config = GlobalConfig::load_or_empty(file.path());
    assert_eq!(config, GlobalConfig::empty());
    assert!(config.component("UModal").is_none());
}

#[test]
fn test_install_lifecycle() {
    assert!(matches!(global::current(), GlobalHandle::NotLoaded));

    let config = GlobalConfig::load(&fixtures::global_json_path()).unwrap();
    global::install(config).unwrap();

    let installed = global::current().get().unwrap();
    assert_eq!(installed.strategy(), Some(MergeStrategy::Replace));

    let again = global::install(GlobalConfig::empty());
    assert!(matches!(again, Err(ConfigError::AlreadyInstalled)));
}
