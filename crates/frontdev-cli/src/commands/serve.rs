//! Serve mode: the watch worker and the foreground server.

use std::future::Future;

use tokio::sync::{mpsc, oneshot};

use crate::assets::StaticAssets;
use crate::dev::{DevBuilder, DevServer, FileChange, FileWatcher, RebuildHandler};
use crate::error::Result;
use crate::handoff::CompletionToken;
use crate::ui;

/// Build, then rebuild on every change until `stop` fires.
///
/// Build failures are reported and watching goes on. The token is completed
/// once the loop ends, with `Ok` unless watching itself broke.
pub async fn watch_and_rebuild(
    builder: DevBuilder,
    assets: StaticAssets,
    watcher: FileWatcher,
    mut changes: mpsc::Receiver<FileChange>,
    mut stop: oneshot::Receiver<()>,
    token: CompletionToken,
) {
    let handler = RebuildHandler::new(assets);
    ui::info(&format!("Watching {} for changes", watcher.root().display()));

    let first = builder.build().await;
    handler.on_rebuild(&first).await;

    let outcome = loop {
        tokio::select! {
            _ = &mut stop => break Ok(()),
            change = changes.recv() => {
                let Some(change) = change else {
                    tracing::warn!("file watcher closed, no more rebuilds");
                    break Ok(());
                };
                let pending = drain(&mut changes);
                tracing::debug!(
                    path = %change.path().display(),
                    coalesced = pending,
                    "rebuilding"
                );
                let outcome = builder.build().await;
                handler.on_rebuild(&outcome).await;
            }
        }
    };

    drop(watcher);
    token.complete(outcome);
}

/// Changes that queued up while the previous build ran collapse into one.
fn drain(changes: &mut mpsc::Receiver<FileChange>) -> usize {
    let mut count = 0;
    while changes.try_recv().is_ok() {
        count += 1;
    }
    count
}

/// Bind and serve until `shutdown` resolves.
pub async fn run_server<F>(server: &DevServer, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = server.bind().await?;
    server.serve(listener, shutdown).await
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            // Without a signal handler the server can only stop on its own.
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
