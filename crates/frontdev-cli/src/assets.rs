//! Static assets that ship next to the bundle (`favicon.ico`, `index.html`).
//!
//! Two ways to get them into the output directory:
//!
//! - [`StaticAssets::copy_into_out_dir`]: the post-build copy. Checks that
//!   every source exists before touching the output directory, then streams
//!   each file. Any failure is fatal.
//! - [`StaticAssets::link_into_out_dir`]: the per-rebuild hard link in watch
//!   mode. Best effort; failures are returned for the caller to log.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};

use crate::config::DevToolConfig;
use crate::error::{BuildError, Result};

/// One asset: where it lives and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// A hard link that could not be created.
#[derive(Debug)]
pub struct LinkFailure {
    pub asset: Asset,
    pub error: io::Error,
}

#[derive(Debug, Clone)]
pub struct StaticAssets {
    assets: Vec<Asset>,
    out_dir: PathBuf,
}

impl StaticAssets {
    pub fn new(out_dir: impl Into<PathBuf>, sources: impl IntoIterator<Item = PathBuf>) -> Self {
        let out_dir = out_dir.into();
        let assets = sources
            .into_iter()
            .filter_map(|source| {
                let name = source.file_name()?.to_os_string();
                Some(Asset {
                    dest: out_dir.join(name),
                    source,
                })
            })
            .collect();
        Self { assets, out_dir }
    }

    /// Assets from the configuration, resolved against the project root.
    pub fn from_config(config: &DevToolConfig) -> Self {
        Self::new(
            config.out_dir(),
            config.static_assets.iter().map(|p| config.resolve(p)),
        )
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Open every source, failing on the first one that is missing or
    /// unreadable. Nothing is written.
    pub async fn verify(&self) -> Result<Vec<File>> {
        let mut opened = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            match File::open(&asset.source).await {
                Ok(file) => opened.push(file),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(BuildError::MissingAsset(asset.source.clone()).into());
                }
                Err(source) => {
                    return Err(BuildError::AssetCopyFailed {
                        path: asset.source.clone(),
                        source,
                    }
                    .into());
                }
            }
        }
        Ok(opened)
    }

    /// Copy every asset into the output directory, byte for byte.
    ///
    /// Returns the destination paths.
    pub async fn copy_into_out_dir(&self) -> Result<Vec<PathBuf>> {
        let sources = self.verify().await?;

        fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|source| BuildError::AssetCopyFailed {
                path: self.out_dir.clone(),
                source,
            })?;

        let mut copied = Vec::with_capacity(self.assets.len());
        for (asset, mut source_file) in self.assets.iter().zip(sources) {
            let copy_failed = |source| BuildError::AssetCopyFailed {
                path: asset.dest.clone(),
                source,
            };

            // The destination may be a hard link to the source from watch
            // mode; truncating it in place would empty the source too.
            remove_stale(&asset.dest).await.map_err(copy_failed)?;
            let mut dest_file = File::create(&asset.dest).await.map_err(copy_failed)?;
            let bytes = tokio::io::copy(&mut source_file, &mut dest_file)
                .await
                .map_err(copy_failed)?;
            dest_file.sync_all().await.map_err(copy_failed)?;

            tracing::debug!(
                source = %asset.source.display(),
                dest = %asset.dest.display(),
                bytes,
                "copied static asset"
            );
            copied.push(asset.dest.clone());
        }

        Ok(copied)
    }

    /// Hard-link every asset into the output directory, replacing whatever
    /// is there. Keeps going past failures.
    pub async fn link_into_out_dir(&self) -> Vec<LinkFailure> {
        let mut failures = Vec::new();

        if let Err(error) = fs::create_dir_all(&self.out_dir).await {
            return self
                .assets
                .iter()
                .map(|asset| LinkFailure {
                    asset: asset.clone(),
                    error: io::Error::new(error.kind(), error.to_string()),
                })
                .collect();
        }

        for asset in &self.assets {
            if let Err(error) = replace_with_link(&asset.source, &asset.dest).await {
                failures.push(LinkFailure {
                    asset: asset.clone(),
                    error,
                });
            }
        }

        failures
    }
}

async fn replace_with_link(source: &Path, dest: &Path) -> io::Result<()> {
    remove_stale(dest).await?;
    fs::hard_link(source, dest).await
}

async fn remove_stale(dest: &Path) -> io::Result<()> {
    match fs::remove_file(dest).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
