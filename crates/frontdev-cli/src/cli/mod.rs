//! Command-line interface definition for frontdev.
//!
//! Two modes, combinable:
//!
//! - `frontdev --build` - bundle once, then copy the static assets into the
//!   output directory
//! - `frontdev --serve` - bundle, watch and rebuild, serve the output
//!   directory and proxy `/api/*` to the backend
//!
//! With both flags the server runs until Ctrl+C and the copy happens after.
//! The single-dash spellings `-build` and `-serve` are accepted too.


use clap::{ArgGroup, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Single-dash long flags and their clap spelling.
const SINGLE_DASH_FLAGS: &[(&str, &str)] = &[("-build", "--build"), ("-serve", "--serve")];

/// frontdev - bundle and serve a single-page frontend
#[derive(Parser, Debug)]
#[command(
    name = "frontdev",
    version,
    about = "Bundle and serve a single-page frontend",
    long_about = "frontdev bundles index.tsx into a minified dist/index.js with a linked source map.\n\
                  In serve mode it rebuilds on every change, serves dist on [::]:8000 and\n\
                  forwards /api/* to the backend on [::]:8080.",
    group(ArgGroup::new("mode").args(["build", "serve"]).required(true).multiple(true))
)]
pub struct Cli {
    /// Bundle once and copy the static assets into the output directory
    #[arg(short, long)]
    pub build: bool,

    /// Watch, rebuild, serve the output directory and proxy /api/*
    #[arg(short, long)]
    pub serve: bool,

    /// Configuration file (defaults to frontdev.toml in the project directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// What a run does, derived from `--build` / `--serve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One build; errors are fatal; then the post-build copy.
    Build,
    /// Watch mode plus dev server until interrupted.
    Serve,
    /// Serve, then the post-build copy once serving stops.
    ServeThenBuild,
}

impl Mode {
    pub fn serves(self) -> bool {
        matches!(self, Mode::Serve | Mode::ServeThenBuild)
    }

    pub fn copies_assets(self) -> bool {
        matches!(self, Mode::Build | Mode::ServeThenBuild)
    }
}

impl Cli {
    /// Parse the process arguments, accepting `-build` / `-serve`.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn mode(&self) -> Mode {
        match (self.build, self.serve) {
            (_, false) => Mode::Build,
            (false, true) => Mode::Serve,
            (true, true) => Mode::ServeThenBuild,
        }
    }
}

/// Rewrite `-build` / `-serve` to `--build` / `--serve`. Arguments after a
/// bare `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            SINGLE_DASH_FLAGS
                .iter()
                .find(|(single, _)| arg == *single)
                .map(|(_, double)| OsString::from(*double))
                .unwrap_or(arg)
        })
        .collect()
}
