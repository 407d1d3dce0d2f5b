//! Configuration loading errors

/// Errors raised while reading or installing configuration.
///
/// The merge engine itself never fails; these only come from the loading
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Shape error: {0}")]
    ShapeError(String),

    #[error("global configuration is already installed")]
    AlreadyInstalled,
}
