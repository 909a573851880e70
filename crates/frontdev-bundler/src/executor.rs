use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Either;
use path_clean::PathClean;
use rolldown::{BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, ResolveOptions};

use crate::diagnostics;
use crate::options::{BuildOptions, BuildReport};
use crate::{Error, Result, writer};

/// Resolved locations for one build.
struct BuildPaths {
    cwd: PathBuf,
    entry: PathBuf,
    out_dir: PathBuf,
    chunk_name: String,
}

fn resolve_paths(options: &BuildOptions) -> Result<BuildPaths> {
    let cwd = options.resolve(Path::new("."))?.clean();
    let entry = options.resolve(&options.entry)?.clean();
    let outfile = options.resolve(&options.outfile)?.clean();

    if !entry.is_file() {
        return Err(Error::EntryNotFound(entry));
    }

    if outfile.extension().and_then(|e| e.to_str()) != Some("js") {
        return Err(Error::InvalidConfig(format!(
            "Output file '{}' must end in .js",
            options.outfile.display()
        )));
    }

    let chunk_name = outfile
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::InvalidConfig(format!(
                "Output file '{}' has no usable file name",
                options.outfile.display()
            ))
        })?
        .to_string();

    let out_dir = outfile
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::InvalidOutputPath(outfile.display().to_string()))?;

    Ok(BuildPaths {
        cwd,
        entry,
        out_dir,
        chunk_name,
    })
}

fn configure_rolldown_options(options: &BuildOptions, paths: &BuildPaths) -> BundlerOptions {
    BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(paths.chunk_name.clone()),
            import: paths.entry.to_string_lossy().into_owned(),
        }]),
        cwd: Some(paths.cwd.clone()),
        dir: Some(paths.out_dir.to_string_lossy().into_owned()),
        format: Some(OutputFormat::Iife),
        platform: Some(Platform::Browser),
        sourcemap: options.sourcemap.to_rolldown(),
        minify: options
            .minify
            .then(|| rolldown::RawMinifyOptions::from(true)),
        transform: Some(rolldown_common::BundlerTransformOptions {
            target: Some(Either::Right(options.target.to_target_list())),
            ..Default::default()
        }),
        resolve: Some(configure_resolution(&paths.cwd)),
        ..Default::default()
    }
}

/// `node_modules` lookup from `cwd` up to the filesystem root.
fn configure_resolution(cwd: &Path) -> ResolveOptions {
    let modules = cwd
        .ancestors()
        .map(|dir| dir.join("node_modules").to_string_lossy().into_owned())
        .chain(std::iter::once("node_modules".to_string()))
        .collect();

    ResolveOptions {
        main_fields: Some(vec![
            "browser".to_string(),
            "module".to_string(),
            "main".to_string(),
        ]),
        extensions: Some(
            [".tsx", ".ts", ".jsx", ".js", ".mjs", ".json"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

pub(crate) async fn execute(options: &BuildOptions) -> Result<BuildReport> {
    let started = Instant::now();
    let paths = resolve_paths(options)?;

    tracing::debug!(
        entry = %paths.entry.display(),
        out_dir = %paths.out_dir.display(),
        minify = options.minify,
        "starting build"
    );

    let mut bundler = BundlerBuilder::default()
        .with_options(configure_rolldown_options(options, &paths))
        .build()
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    let output = bundler
        .generate()
        .await
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    let warnings: Vec<_> = output
        .warnings
        .iter()
        .map(|w| diagnostics::extract_warning(w))
        .collect();

    let files = writer::write_bundle_to(&output, &paths.out_dir)?;

    let report = BuildReport {
        files,
        warnings,
        duration: started.elapsed(),
    };
    tracing::debug!(
        files = report.files.len(),
        warnings = report.warnings.len(),
        duration_ms = u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
        "build finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceMapMode;

    #[test]
    fn test_resolve_paths_rejects_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let options = BuildOptions::new("index.tsx").cwd(dir.path());
        assert!(matches!(
            resolve_paths(&options),
            Err(Error::EntryNotFound(path)) if path.ends_with("index.tsx")
        ));
    }

    #[test]
    fn test_resolve_paths_requires_js_outfile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.tsx"), "export {}").unwrap();
        let options = BuildOptions::new("index.tsx")
            .cwd(dir.path())
            .outfile("dist/index.mjs");
        assert!(matches!(resolve_paths(&options), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_configure_rolldown_options() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.tsx"), "export {}").unwrap();
        let options = BuildOptions::new("index.tsx")
            .cwd(dir.path())
            .minify(false)
            .sourcemap(SourceMapMode::Linked);
        let paths = resolve_paths(&options).unwrap();

        assert_eq!(paths.chunk_name, "index");
        assert!(paths.out_dir.ends_with("dist"));

        let rolldown_options = configure_rolldown_options(&options, &paths);
        assert!(matches!(rolldown_options.format, Some(OutputFormat::Iife)));
        assert!(rolldown_options.minify.is_none());
        let input = rolldown_options.input.unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(input[0].name.as_deref(), Some("index"));
    }

    #[test]
    fn test_resolution_walks_ancestors() {
        let resolve = configure_resolution(Path::new("/a/b"));
        let modules = resolve.modules.unwrap();
        assert_eq!(modules[0], "/a/b/node_modules");
        assert_eq!(modules[1], "/a/node_modules");
        assert_eq!(modules.last().map(String::as_str), Some("node_modules"));
    }
}
