//! Build-only worker.

use crate::dev::DevBuilder;
use crate::error::{BuildError, Result};
use crate::handoff::CompletionToken;
use crate::ui;

/// Run a single build and report its outcome through `token`.
pub async fn build_once(builder: DevBuilder, token: CompletionToken) {
    let outcome = run(&builder).await;
    if !token.complete(outcome) {
        tracing::debug!("build finished after the main task stopped waiting");
    }
}

async fn run(builder: &DevBuilder) -> Result<()> {
    let report = builder.build().await.map_err(BuildError::Bundler)?;

    let cwd = builder.options().cwd.as_deref();
    let files = report
        .files
        .iter()
        .map(|f| {
            cwd.and_then(|cwd| f.strip_prefix(cwd).ok())
                .unwrap_or(f)
                .display()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ");
    ui::success(&format!(
        "Built {} in {}",
        files,
        ui::format_duration(report.duration)
    ));
    Ok(())
}
