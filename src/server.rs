//! Server initialization and startup logic for LiveView.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use liveview_api::{ApiConfig, ApiServer, AppState, RouteConfig};
use liveview_config::{AuthConfig, Config, ConfigLoader, SessionStrategy, TokenAlgorithm};
use liveview_core::{
    CloseStrategy, ConnectionRegistry, JwtAuthenticator, LiveNavigation, SessionRouter,
};
use tracing::{info, warn};

use crate::client::page_routes;
use crate::demo;
use crate::swap::SwapStore;

/// Build the token authenticator described by `[auth]`.
pub(crate) fn build_authenticator(
    config: &AuthConfig,
) -> Result<JwtAuthenticator, Box<dyn std::error::Error>> {
    let ttl = Duration::from_secs(config.token_ttl_secs);
    let authenticator = match config.algorithm {
        TokenAlgorithm::Hs256 => {
            let secret = config.secret.as_deref().unwrap_or_default();
            JwtAuthenticator::hs256(secret.as_bytes(), ttl)?
        }
        TokenAlgorithm::Rs256 => {
            let private_pem = read_key(config.private_key_path.as_deref(), "private_key_path")?;
            let public_pem = read_key(config.public_key_path.as_deref(), "public_key_path")?;
            JwtAuthenticator::rs256(&private_pem, &public_pem, ttl)?
        }
    };
    Ok(authenticator)
}

fn read_key(path: Option<&str>, field: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let path = path.ok_or_else(|| format!("auth.{field} is required for rs256"))?;
    let path = ConfigLoader::expand_path(path);
    std::fs::read(&path).map_err(|e| format!("Failed to read {path}: {e}").into())
}

/// Close strategy described by `[session]`. Swapped sessions go to `swap`.
pub(crate) fn close_strategy(config: &Config, swap: &Arc<SwapStore>) -> CloseStrategy {
    let after = Duration::from_secs(config.session.inactivity_timeout_secs);
    match config.session.strategy {
        SessionStrategy::Delete => CloseStrategy::delete_after(after),
        SessionStrategy::Swap => {
            let swap = Arc::clone(swap);
            CloseStrategy::swap_after(after, move |swapped| swap.store(swapped))
        }
    }
}

/// Registry serving the demo components.
pub(crate) fn build_registry(
    config: &Config,
    authenticator: Arc<JwtAuthenticator>,
    swap: &Arc<SwapStore>,
) -> ConnectionRegistry {
    let template = SessionRouter::new()
        .with_event_handler(LiveNavigation)
        .with_fallback_template(demo::not_found_page);

    ConnectionRegistry::new(authenticator, demo::components)
        .with_template(template)
        .with_close_strategy(close_strategy(config, swap))
        .with_connection_created_hook(|router| {
            info!("Session {} has a new connection", router.id());
        })
}

fn route_config(config: &Config) -> RouteConfig {
    RouteConfig {
        websocket_path: config.server.websocket_path.clone(),
        token_path: config.server.token_path.clone(),
    }
}

/// Assemble the API server with the host pages mounted.
pub(crate) fn build_server(
    config: &Config,
    swap: &Arc<SwapStore>,
) -> Result<(ApiServer, Arc<AppState>), Box<dyn std::error::Error>> {
    let authenticator = Arc::new(build_authenticator(&config.auth)?);
    let registry = build_registry(config, Arc::clone(&authenticator), swap);
    let state = Arc::new(AppState::new(Arc::new(registry), authenticator));

    let routes = route_config(config);
    let api_config =
        ApiConfig::new(config.server.host.clone(), config.server.port).with_routes(routes.clone());
    let pages: Router = page_routes(&routes);
    let server = ApiServer::new(api_config, Arc::clone(&state)).merge(pages);
    Ok((server, state))
}

/// Run the server until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let swap = Arc::new(SwapStore::new());
    let (server, state) = build_server(&config, &swap)?;

    info!("LiveView ready:");
    info!("  Pages:     http://{}/", server.addr());
    info!("  WebSocket: {}", config.server.websocket_path);
    info!("  Token:     {}", config.server.token_path);
    info!(
        "  Sessions expire after {}s ({:?})",
        config.session.inactivity_timeout_secs, config.session.strategy
    );

    server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!(
        "Shutting down with {} sessions, {} swapped out",
        state.registry.session_count(),
        swap.len()
    );
    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
