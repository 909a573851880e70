//! Development mode builder.

use frontdev_bundler::{BuildOptions, BuildReport};
use tracing::Instrument;

/// Runs builds with a fixed set of bundler options.
#[derive(Debug, Clone)]
pub struct DevBuilder {
    options: BuildOptions,
}

impl DevBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Run one build. Output is only written when it succeeds.
    pub async fn build(&self) -> frontdev_bundler::Result<BuildReport> {
        let span = tracing::debug_span!("build", entry = %self.options.entry.display());
        let result = self.options.build().instrument(span).await;
        match &result {
            Ok(report) => {
                for warning in &report.warnings {
                    tracing::warn!("{warning}");
                }
                tracing::debug!(
                    files = report.files.len(),
                    duration_ms = u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
                    "build succeeded"
                );
            }
            Err(e) => tracing::debug!(error = %e, "build failed"),
        }
        result
    }
}
