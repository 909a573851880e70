//! Development server.
//!
//! The route table is an explicit [`Router`] built per server: `/api/` and
//! everything below it goes to the [`ApiProxy`], every other path is a static
//! file from the output directory (`/` serves `index.html`).

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{Router, routing::any};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::dev::proxy::{ApiProxy, proxy_handler};
use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct DevServer {
    listen: SocketAddr,
    out_dir: PathBuf,
    proxy: ApiProxy,
}

impl DevServer {
    pub fn new(listen: SocketAddr, out_dir: impl Into<PathBuf>, upstream: SocketAddr) -> Self {
        Self {
            listen,
            out_dir: out_dir.into(),
            proxy: ApiProxy::new(upstream),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Build the router: `/api/*` to the proxy, the rest to the file server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/", any(proxy_handler))
            .route("/api/{*path}", any(proxy_handler))
            .fallback_service(ServeDir::new(&self.out_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(self.proxy.clone())
    }

    /// Bind the listen address.
    ///
    /// # Errors
    ///
    /// `CliError::Server` when the address is in use or not permitted.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind(self.listen)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", self.listen, e)))
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        crate::ui::success(&format!(
            "Serving {} on http://{} (/api/* -> http://{})",
            self.out_dir.display(),
            local,
            self.proxy.upstream()
        ));
        tracing::info!(%local, upstream = %self.proxy.upstream(), "dev server listening");

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }
}
