//! Reaction to each watch-mode build.
//!
//! A failed rebuild logs its error records and leaves the previous output in
//! place; a successful one refreshes the static asset links. Neither ends the
//! process.

use frontdev_bundler::{BuildReport, ExtractedDiagnostic};

use crate::assets::StaticAssets;
use crate::ui;

/// What a rebuild ended in.
#[derive(Debug, Clone, PartialEq)]
pub enum RebuildStatus {
    Succeeded { files: usize, links_failed: usize },
    Failed { errors: Vec<ExtractedDiagnostic> },
}

#[derive(Debug, Clone)]
pub struct RebuildHandler {
    assets: StaticAssets,
}

impl RebuildHandler {
    pub fn new(assets: StaticAssets) -> Self {
        Self { assets }
    }

    /// Handle one build outcome.
    pub async fn on_rebuild(
        &self,
        outcome: &frontdev_bundler::Result<BuildReport>,
    ) -> RebuildStatus {
        let report = match outcome {
            Ok(report) => report,
            Err(err) => return Self::report_failure(err),
        };

        ui::success(&format!(
            "new build succeeded in {}",
            ui::format_duration(report.duration)
        ));
        tracing::info!(files = report.files.len(), "new build succeeded");

        let failures = self.assets.link_into_out_dir().await;
        for failure in &failures {
            tracing::debug!(
                source = %failure.asset.source.display(),
                dest = %failure.asset.dest.display(),
                error = ?failure.error.kind(),
                "hard link failed"
            );
            ui::warning(&format!(
                "Could not link {} into {}: {}",
                failure.asset.source.display(),
                self.assets.out_dir().display(),
                failure.error
            ));
        }

        RebuildStatus::Succeeded {
            files: report.files.len(),
            links_failed: failures.len(),
        }
    }

    fn report_failure(err: &frontdev_bundler::Error) -> RebuildStatus {
        let errors = match err.diagnostics() {
            [] => {
                // Not a bundler report (missing entry, write failure): one record.
                tracing::error!("{err}");
                Vec::new()
            }
            records => {
                for record in records {
                    tracing::error!(
                        file = record.file.as_deref().unwrap_or("-"),
                        line = record.line.unwrap_or(0),
                        column = record.column.unwrap_or(0),
                        "{}: {}",
                        record.kind,
                        record.message
                    );
                }
                records.to_vec()
            }
        };
        ui::error("Build failed; serving the previous output");
        RebuildStatus::Failed { errors }
    }
}
