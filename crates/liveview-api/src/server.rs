//! API server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::ApiError;
use crate::http::routes::{RouteConfig, create_router};
use crate::state::AppState;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub routes: RouteConfig,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            routes: RouteConfig::default(),
        }
    }

    pub fn with_routes(mut self, routes: RouteConfig) -> Self {
        self.routes = routes;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8080)
    }
}

/// The API server.
pub struct ApiServer {
    config: ApiConfig,
    app: Router,
}

impl ApiServer {
    pub fn new(config: ApiConfig, state: Arc<AppState>) -> Self {
        let app = create_router(state, &config.routes);
        Self { config, app }
    }

    /// Mount additional routes, e.g. the host pages.
    pub fn merge(mut self, routes: Router) -> Self {
        self.app = self.app.merge(routes);
        self
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        let addr: SocketAddr = self
            .addr()
            .parse()
            .map_err(|_| ApiError::InvalidAddress(self.addr()))?;
        Ok(TcpListener::bind(addr).await?)
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ApiError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("LiveView server listening on {}", listener.local_addr()?);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ApiError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
