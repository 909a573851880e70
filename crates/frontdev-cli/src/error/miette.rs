//! Miette report conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert a `CliError` into a miette report for the top-level error output.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(BuildError::Bundler(e)) => bundler_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

/// Bundler failures keep their own diagnostic code and help; multiple error
/// records are listed one per line.
fn bundler_error_to_miette(err: frontdev_bundler::Error) -> Report {
    let records = err.diagnostics();
    if records.len() <= 1 {
        return Report::new(err);
    }

    let summary = format!(
        "Build failed with {} errors:\n{}",
        records.len(),
        records
            .iter()
            .map(|d| format!("  - {d}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
    Report::new(err).wrap_err(summary)
}
