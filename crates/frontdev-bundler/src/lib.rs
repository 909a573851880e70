//! # frontdev-bundler
//!
//! Rolldown-based bundling for the `frontdev` development tool.
//!
//! One entry point goes in, one minified browser bundle plus its linked
//! source map comes out. Output is written all-or-nothing: a build that
//! reports errors never touches the output directory.
//!
//! ## Quick Start
//!
//! ```no_run
//! use frontdev_bundler::BuildOptions;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = BuildOptions::new("index.tsx")
//!     .outfile("dist/index.js")
//!     .minify(true)
//!     .build()
//!     .await?;
//!
//! for file in &report.files {
//!     println!("wrote {}", file.display());
//! }
//! # Ok(()) }
//! ```

pub mod diagnostics;
mod executor;
pub mod options;
pub mod target;
pub mod writer;

pub use diagnostics::{DiagnosticKind, DiagnosticSeverity, ExtractedDiagnostic};
pub use options::{BuildOptions, BuildReport, SourceMapMode};
pub use target::{Engine, EngineName, Target};

use std::path::PathBuf;

/// Why a build produced no bundle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rolldown rejected the input; one record per reported error.
    #[error("Build failed: {}", summarize(.0))]
    Bundler(Vec<ExtractedDiagnostic>),

    #[error("Entry point not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    #[error("Invalid build options: {0}")]
    InvalidConfig(String),

    /// An output file name would land outside the output directory.
    #[error("Refusing to write outside the output directory: {0}")]
    InvalidOutputPath(String),

    #[error("Could not write bundle: {0}")]
    WriteFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Collect the records of a rolldown error batch.
    pub fn from_rolldown_batch(batch: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(diagnostics::extract_from_rolldown_error(batch))
    }

    /// Error records of a bundler failure; empty for the other variants.
    pub fn diagnostics(&self) -> &[ExtractedDiagnostic] {
        match self {
            Error::Bundler(records) => records,
            _ => &[],
        }
    }
}

fn summarize(records: &[ExtractedDiagnostic]) -> String {
    match records {
        [] => "no details reported".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        let code = match self {
            Error::Bundler(_) => "frontdev::bundle",
            Error::EntryNotFound(_) => "frontdev::entry",
            Error::InvalidConfig(_) => "frontdev::options",
            Error::InvalidOutputPath(_) => "frontdev::output_path",
            Error::WriteFailure(_) => "frontdev::write",
            Error::Io(_) => "frontdev::io",
        };
        Some(Box::new(code))
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        let help: String = match self {
            Error::EntryNotFound(path) => format!(
                "Create {} or point `entry` in frontdev.toml at an existing file",
                path.display()
            ),
            Error::InvalidConfig(_) => "Check `entry` and `outfile` in frontdev.toml".to_string(),
            Error::InvalidOutputPath(_) => {
                "Output names come from `outfile`; keep it a plain file name".to_string()
            }
            Error::WriteFailure(_) => "Check free space and permissions of the output directory".to_string(),
            Error::Bundler(records) => match records.as_slice() {
                [only] => only.help.clone()?,
                [] => return None,
                _ => "Fix the first error; later ones often follow from it".to_string(),
            },
            Error::Io(_) => return None,
        };
        Some(Box::new(help))
    }
}
