//! Build options and the report a successful build returns.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::diagnostics::ExtractedDiagnostic;
use crate::{Result, Target};

/// Where the source map goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapMode {
    /// Separate `<outfile>.map`, referenced from the bundle by a trailing
    /// `sourceMappingURL` comment.
    #[default]
    Linked,
    /// Embedded in the bundle as a data URL.
    Inline,
    /// Separate file without the reference comment.
    Hidden,
    /// No source map.
    None,
}

impl SourceMapMode {
    pub(crate) fn to_rolldown(self) -> Option<rolldown::SourceMapType> {
        match self {
            Self::Linked => Some(rolldown::SourceMapType::File),
            Self::Inline => Some(rolldown::SourceMapType::Inline),
            Self::Hidden => Some(rolldown::SourceMapType::Hidden),
            Self::None => None,
        }
    }
}

/// Options for a single bundle of one entry point.
///
/// Relative paths are resolved against [`BuildOptions::cwd`], falling back to
/// the process working directory.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub entry: PathBuf,
    pub outfile: PathBuf,
    pub cwd: Option<PathBuf>,
    /// Full minification: whitespace, syntax compression, mangled names.
    pub minify: bool,
    pub sourcemap: SourceMapMode,
    pub target: Target,
}

impl BuildOptions {
    /// Options for `entry` with the standard browser settings: output to
    /// `dist/index.js`, fully minified, linked source map, esnext target.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            outfile: PathBuf::from("dist/index.js"),
            cwd: None,
            minify: true,
            sourcemap: SourceMapMode::default(),
            target: Target::default(),
        }
    }

    pub fn outfile(mut self, outfile: impl Into<PathBuf>) -> Self {
        self.outfile = outfile.into();
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn sourcemap(mut self, mode: SourceMapMode) -> Self {
        self.sourcemap = mode;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Run the build and write its output.
    ///
    /// On bundler errors nothing is written and [`crate::Error::Bundler`]
    /// carries every error record.
    pub async fn build(&self) -> Result<BuildReport> {
        crate::executor::execute(self).await
    }

    pub(crate) fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let base = match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir()?,
        };
        Ok(base.join(path))
    }
}

/// Artifacts of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Every file written, bundle first.
    pub files: Vec<PathBuf>,
    pub warnings: Vec<ExtractedDiagnostic>,
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BuildOptions::new("index.tsx");
        assert_eq!(options.outfile, PathBuf::from("dist/index.js"));
        assert!(options.minify);
        assert_eq!(options.sourcemap, SourceMapMode::Linked);
        assert_eq!(options.target, Target::default());
    }

    #[test]
    fn test_resolve_relative_to_cwd() {
        let options = BuildOptions::new("index.tsx").cwd("/project");
        assert_eq!(
            options.resolve(Path::new("dist/index.js")).unwrap(),
            PathBuf::from("/project/dist/index.js")
        );
        assert_eq!(
            options.resolve(Path::new("/abs/index.tsx")).unwrap(),
            PathBuf::from("/abs/index.tsx")
        );
    }

    #[test]
    fn test_linked_sourcemap_maps_to_file() {
        assert!(matches!(
            SourceMapMode::Linked.to_rolldown(),
            Some(rolldown::SourceMapType::File)
        ));
        assert!(SourceMapMode::None.to_rolldown().is_none());
    }
}
