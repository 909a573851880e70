//! Tool configuration.
//!
//! A single immutable [`DevToolConfig`] describes what to bundle, which static
//! files accompany the bundle, and where the dev server listens and proxies
//! to. It is loaded once at startup (see [`loading`]) and shared read-only.

mod loading;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use frontdev_bundler::{BuildOptions, Engine, SourceMapMode, Target};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "frontdev.toml";

/// Environment variable prefix (`FRONTDEV_LISTEN`, `FRONTDEV_ENTRY`, ...).
pub const ENV_PREFIX: &str = "FRONTDEV_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevToolConfig {
    /// Entry point of the bundle.
    pub entry: PathBuf,

    /// Bundle output file; its directory is the output directory.
    pub outfile: PathBuf,

    /// Files copied (build) or hard-linked (serve) next to the bundle.
    pub static_assets: Vec<PathBuf>,

    /// Minimum engine versions the bundle must run on.
    pub engines: Vec<Engine>,

    /// Minify the bundle (whitespace, syntax and identifier names).
    pub minify: bool,

    /// Dev server listen address.
    pub listen: SocketAddr,

    /// Backend receiving `/api/*` requests.
    pub upstream: SocketAddr,

    /// Per-file debounce window for watch events.
    pub debounce_ms: u64,

    /// Watcher ignore patterns: directory names or `*.ext`.
    pub watch_ignore: Vec<String>,

    /// Base directory for every relative path above. Set at load time.
    #[serde(skip)]
    pub root: PathBuf,
}

impl Default for DevToolConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("index.tsx"),
            outfile: PathBuf::from("dist/index.js"),
            static_assets: vec![PathBuf::from("favicon.ico"), PathBuf::from("index.html")],
            engines: Target::default().engines,
            minify: true,
            listen: SocketAddr::from(([0u16; 8], 8000)),
            upstream: SocketAddr::from(([0u16; 8], 8080)),
            debounce_ms: 100,
            watch_ignore: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "dist".to_string(),
                "*.log".to_string(),
            ],
            root: PathBuf::new(),
        }
    }
}

impl DevToolConfig {
    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Directory the bundle, its map and the static assets land in.
    pub fn out_dir(&self) -> PathBuf {
        let outfile = self.resolve(&self.outfile);
        outfile
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    /// Watcher ignore patterns plus the output directory itself, so writing
    /// the bundle never triggers another rebuild.
    pub fn watch_ignore_patterns(&self) -> Vec<String> {
        let mut patterns = self.watch_ignore.clone();
        if let Ok(rel) = self.out_dir().strip_prefix(&self.root) {
            let rel = rel.to_string_lossy().replace('\\', "/");
            if !rel.is_empty() && !patterns.contains(&rel) {
                patterns.push(rel);
            }
        }
        patterns
    }

    /// Bundler options for this project.
    pub fn bundler_options(&self) -> BuildOptions {
        BuildOptions::new(&self.entry)
            .cwd(&self.root)
            .outfile(&self.outfile)
            .minify(self.minify)
            .sourcemap(SourceMapMode::Linked)
            .target(Target::new(self.engines.clone()))
    }

    /// Validate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.entry.as_os_str().is_empty() {
            return Err(invalid("entry", "", "Set `entry` to the bundle's entry point"));
        }

        if self.outfile.extension().and_then(|e| e.to_str()) != Some("js") {
            return Err(invalid(
                "outfile",
                &self.outfile.display().to_string(),
                "The output file must end in .js, e.g. dist/index.js",
            ));
        }

        let has_dir = self
            .outfile
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if !has_dir {
            return Err(invalid(
                "outfile",
                &self.outfile.display().to_string(),
                "Put the output in its own directory, e.g. dist/index.js",
            ));
        }

        if let Some(empty) = self
            .static_assets
            .iter()
            .find(|p| p.file_name().is_none())
        {
            return Err(invalid(
                "static_assets",
                &empty.display().to_string(),
                "Every static asset must name a file",
            ));
        }

        if self.listen == self.upstream {
            return Err(invalid(
                "upstream",
                &self.upstream.to_string(),
                "The API upstream must differ from the dev server's listen address",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str, hint: &str) -> crate::error::CliError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}
