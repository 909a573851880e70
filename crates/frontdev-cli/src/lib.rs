//! frontdev - build and serve a single-page frontend.
//!
//! One binary with two modes that may be combined:
//!
//! - `--build` bundles `index.tsx` into a minified `dist/index.js` with a
//!   linked source map, then copies `favicon.ico` and `index.html` next to it
//! - `--serve` rebuilds on every change, hard-links the static assets after
//!   each successful build, serves `dist` on `[::]:8000` and proxies `/api/*`
//!   to `[::]:8080`
//!
//! # Architecture
//!
//! - [`cli`] - command-line flags and the resulting [`cli::Mode`]
//! - [`config`] - layered configuration (defaults, `frontdev.toml`, env)
//! - [`commands`] - run orchestration
//! - [`handoff`] - one-shot completion between the build worker and main
//! - [`assets`] - static asset copy and link
//! - [`dev`] - watcher, rebuild handling, dev server and API proxy
//! - [`error`] - error types and their miette rendering
//! - [`logger`] / [`ui`] - tracing setup and terminal status lines
//!
//! # Example
//!
//! ```no_run
//! use frontdev_cli::{assets::StaticAssets, config::DevToolConfig, dev::DevBuilder};
//!
//! # async fn run() -> frontdev_cli::Result<()> {
//! let config = DevToolConfig::load(std::path::Path::new("."), None)?;
//! DevBuilder::new(config.bundler_options()).build().await?;
//! StaticAssets::from_config(&config).copy_into_out_dir().await?;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod handoff;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result};
