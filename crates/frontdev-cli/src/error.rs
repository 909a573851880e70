//! Error handling for the frontdev CLI.
//!
//! `CliError` is what commands return. Domain errors (`ConfigError`,
//! `BuildError`) carry the detail and convert automatically via `#[from]`.
//! Messages end with a `Hint:` line where there is something to do about it.

mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bundling or the post-build copy failed.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dev server could not bind or stopped with an error.
    #[error("Server error: {0}")]
    Server(String),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// The build worker ended without reporting an outcome.
    #[error("Build worker stopped unexpectedly: {0}")]
    Worker(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Create frontdev.toml or point --config at an existing file", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

/// Build and asset errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The bundler rejected the input.
    #[error("{0}")]
    Bundler(#[from] frontdev_bundler::Error),

    /// A static asset is missing; raised before anything is copied.
    #[error("Static asset not found: {}\n\nHint: Create the file or remove it from `static_assets`", .0.display())]
    MissingAsset(PathBuf),

    /// Copying a static asset into the output directory failed.
    #[error("Failed to copy {}: {source}\n\nHint: Check output directory permissions", .path.display())]
    AssetCopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CLI operations.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

impl From<frontdev_bundler::Error> for CliError {
    fn from(err: frontdev_bundler::Error) -> Self {
        CliError::Build(BuildError::Bundler(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_error_not_found() {
        let msg = ConfigError::NotFound(PathBuf::from("frontdev.toml")).to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("frontdev.toml"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_missing_asset_message() {
        let msg = BuildError::MissingAsset(PathBuf::from("favicon.ico")).to_string();
        assert!(msg.contains("favicon.ico"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_asset_copy_failed_keeps_source() {
        use std::error::Error as _;
        let err = BuildError::AssetCopyFailed {
            path: PathBuf::from("index.html"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("index.html"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_bundler_error_converts_to_build_error() {
        let err: CliError = frontdev_bundler::Error::InvalidConfig("bad".into()).into();
        assert!(matches!(err, CliError::Build(BuildError::Bundler(_))));
    }
}
