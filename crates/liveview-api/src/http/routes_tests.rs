use super::*;

use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use liveview_core::{Authenticator, ConnectionRegistry, JwtAuthenticator};
use liveview_protocols::{ClientEvent, ComponentError, ConnectionHandle, RoutableComponent};
use tower::ServiceExt;

use crate::http::handlers::HealthResponse;

struct Home;

#[async_trait]
impl RoutableComponent for Home {
    fn path(&self) -> &str {
        "/"
    }

    async fn base_template(&self) -> Result<String, ComponentError> {
        Ok("<h1>home</h1>".to_string())
    }

    async fn receive_event(
        &self,
        _connection: &ConnectionHandle,
        _event: &ClientEvent,
    ) -> Result<(), ComponentError> {
        Ok(())
    }
}

fn test_state() -> (Arc<AppState>, Arc<JwtAuthenticator>) {
    let auth = Arc::new(
        JwtAuthenticator::hs256(b"routes-test-secret-routes-test-secret", Duration::from_secs(60))
            .unwrap(),
    );
    let registry = ConnectionRegistry::new(auth.clone(), || {
        vec![Arc::new(Home) as Arc<dyn RoutableComponent>]
    });
    let state = Arc::new(AppState::new(Arc::new(registry), auth.clone()));
    (state, auth)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (state, _) = test_state();
    let app = create_router(state, &RouteConfig::default());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.sessions, 0);
    assert_eq!(health.connections, 0);
}

#[tokio::test]
async fn test_issue_token_endpoint() {
    let (state, auth) = test_state();
    let app = create_router(state, &RouteConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/issue-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    let token = body_string(response).await;
    assert!(auth.authenticate(&token).is_ok());
}

#[tokio::test]
async fn test_custom_token_path() {
    let (state, _) = test_state();
    let routes = RouteConfig {
        token_path: "/token".to_string(),
        ..RouteConfig::default()
    };
    let app = create_router(state, &routes);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/token").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/issue-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_websocket_route_requires_upgrade() {
    let (state, _) = test_state();
    let app = create_router(state, &RouteConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/websocket?authToken=x&initialURL=/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[test]
fn test_route_config_default() {
    let routes = RouteConfig::default();
    assert_eq!(routes.websocket_path, "/websocket");
    assert_eq!(routes.token_path, "/api/issue-token");
}
