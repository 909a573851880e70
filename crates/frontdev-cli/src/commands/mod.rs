//! Run orchestration.
//!
//! The bundling work runs on a spawned worker task that reports back through
//! a one-shot [`crate::handoff`] completion. The main task serves (in serve
//! mode), waits for that completion and then does the post-build copy when
//! `--build` was given.

pub mod build;
pub mod serve;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::assets::StaticAssets;
use crate::cli::Cli;
use crate::config::DevToolConfig;
use crate::dev::{DevBuilder, DevServer, FileWatcher};
use crate::error::{CliError, Result};
use crate::{handoff, ui};

/// Execute a parsed command line. Serving stops on Ctrl+C.
pub async fn execute(cli: Cli) -> Result<()> {
    run(cli, serve::shutdown_signal()).await
}

/// Execute a parsed command line; in serve mode the server stops once
/// `shutdown` resolves.
pub async fn run<F>(cli: Cli, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let mode = cli.mode();
    let root = project_root(cli.cwd.as_deref())?;

    let config = DevToolConfig::load(&root, cli.config.as_deref())?;
    config.validate()?;
    let config = Arc::new(config);
    tracing::debug!(?mode, root = %root.display(), "configuration loaded");

    let builder = DevBuilder::new(config.bundler_options());
    let assets = StaticAssets::from_config(&config);
    let (token, completion) = handoff::completion();

    let outcome = if mode.serves() {
        // Watch before spawning so a watcher failure surfaces immediately.
        let (watcher, changes) = FileWatcher::new(
            root.clone(),
            config.watch_ignore_patterns(),
            config.debounce_ms,
        )?;
        let (stop_tx, stop_rx) = oneshot::channel();

        let worker = tokio::spawn(serve::watch_and_rebuild(
            builder,
            assets.clone(),
            watcher,
            changes,
            stop_rx,
            token,
        ));

        let server = DevServer::new(config.listen, config.out_dir(), config.upstream);
        let served = serve::run_server(&server, shutdown).await;
        if let Err(e) = &served {
            tracing::error!(error = %e, "dev server stopped");
        }

        // Serving is over either way: release the worker and wait for it.
        let _ = stop_tx.send(());
        let worker_outcome = completion.wait().await;
        if let Err(e) = worker.await {
            tracing::debug!(error = %e, "watch worker did not finish cleanly");
        }
        served.and(worker_outcome)
    } else {
        tokio::spawn(build::build_once(builder, token));
        completion.wait().await
    };
    outcome?;

    if mode.copies_assets() {
        let copied = assets.copy_into_out_dir().await?;
        ui::success(&format!(
            "Copied {} into {}",
            display_names(&copied),
            relative_to(&config.out_dir(), &root).display()
        ));
    }

    Ok(())
}

/// Resolve the project directory from `--cwd`.
pub fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let root = match cwd {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current.join(dir),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "project directory does not exist: {}",
            root.display()
        )));
    }
    Ok(root)
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn display_names(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}
