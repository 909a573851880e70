//! Secure, all-or-nothing writing of bundle output.
//!
//! Every file name produced by the bundler is checked against directory
//! traversal before anything touches disk. Content is written to temporary
//! siblings first and only renamed into place once every temporary write
//! has succeeded, so a failure never leaves half a bundle behind.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rolldown::BundleOutput;
use rolldown_common::Output;

use crate::{Error, Result};

/// Write every chunk and asset of `output` into `dir`.
///
/// Returns the written paths in bundle order.
pub fn write_bundle_to(output: &BundleOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let operations = output
        .assets
        .iter()
        .map(|item| {
            let (filename, content) = match item {
                Output::Chunk(chunk) => (chunk.filename.as_str(), chunk.code.as_bytes()),
                Output::Asset(asset) => (asset.filename.as_str(), asset.source.as_bytes()),
            };
            Ok((validate_output_path(&dir, filename)?, content))
        })
        .collect::<Result<Vec<_>>>()?;

    write_files_atomic(&operations)
}

fn normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
    })?;
    Ok(cwd.join(cleaned).clean())
}

/// Resolve `filename` under `base_dir`, rejecting anything that escapes it.
pub(crate) fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// `index.js` -> `index.js.tmp`; keeps `index.js` and `index.js.map` distinct.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".tmp");
    target.with_file_name(name)
}

fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<Vec<PathBuf>> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(operations.len());

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&staged);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        if let Err(e) = fs::write(&temp_path, content) {
            cleanup_temp_files(&staged);
            let _ = fs::remove_file(&temp_path);
            return Err(Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            )));
        }

        staged.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &staged {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&staged);
            Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(staged.into_iter().map(|(_, target)| target).collect())
}

fn cleanup_temp_files(staged: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in staged {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to clean up temporary file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_path_normal() {
        let base = Path::new("/tmp/output");
        assert_eq!(
            validate_output_path(base, "index.js").unwrap(),
            Path::new("/tmp/output/index.js")
        );
        assert_eq!(
            validate_output_path(base, "./index.js.map").unwrap(),
            Path::new("/tmp/output/index.js.map")
        );
    }

    #[test]
    fn test_validate_output_path_traversal() {
        let base = Path::new("/tmp/output");
        assert!(matches!(
            validate_output_path(base, "../etc/passwd"),
            Err(Error::InvalidOutputPath(_))
        ));
        assert!(validate_output_path(base, "safe/../../../../etc/passwd").is_err());
        assert!(validate_output_path(base, ".").is_err());
    }

    #[test]
    fn test_validate_output_path_null_byte() {
        assert!(validate_output_path(Path::new("/tmp/output"), "file\0name.js").is_err());
    }

    #[test]
    fn test_temp_path_keeps_full_name() {
        assert_eq!(
            temp_path_for(Path::new("/out/index.js.map")),
            Path::new("/out/index.js.map.tmp")
        );
    }

    #[test]
    fn test_write_files_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let js = dir.path().join("index.js");
        let map = dir.path().join("index.js.map");
        let ops: Vec<(PathBuf, &[u8])> = vec![(js.clone(), b"a"), (map.clone(), b"b")];

        let written = write_files_atomic(&ops).unwrap();

        assert_eq!(written, vec![js.clone(), map.clone()]);
        assert_eq!(fs::read(&js).unwrap(), b"a");
        assert_eq!(fs::read(&map).unwrap(), b"b");
        assert!(!dir.path().join("index.js.tmp").exists());
    }

    #[test]
    fn test_write_files_atomic_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let js = dir.path().join("index.js");
        // A directory in place of the temp file makes the second write fail.
        fs::create_dir(dir.path().join("index.js.map.tmp")).unwrap();
        let ops: Vec<(PathBuf, &[u8])> =
            vec![(js.clone(), b"a"), (dir.path().join("index.js.map"), b"b")];

        assert!(matches!(write_files_atomic(&ops), Err(Error::WriteFailure(_))));
        assert!(!js.exists());
        assert!(!dir.path().join("index.js.tmp").exists());
    }
}
