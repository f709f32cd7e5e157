//! WebSocket handler implementation.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use liveview_protocols::{Connection, ConnectionHandle};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::connection::{OUTBOUND_BUFFER, Outbound, WsConnection};
use crate::state::AppState;

/// Query parameters of the upgrade request. A request without
/// `initialURL` is upgraded and then closed without creating a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectParams {
    #[serde(rename = "authToken", default)]
    pub auth_token: String,
    #[serde(rename = "initialURL", default)]
    pub initial_url: Option<String>,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

async fn handle_socket(socket: WebSocket, params: ConnectParams, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Outbound>(OUTBOUND_BUFFER);
    let connection = WsConnection::new(tx);
    let handle: ConnectionHandle = connection.clone();
    info!("WebSocket connected: {}", connection.id());

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                Outbound::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let accepted = match params.initial_url.as_deref() {
        Some(initial_url) => state
            .registry
            .accept(handle.clone(), &params.auth_token, initial_url)
            .await
            .is_some(),
        None => {
            warn!("Rejected {}: missing initialURL", connection.id());
            false
        }
    };

    if accepted {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    state
                        .registry
                        .on_inbound_message(handle.clone(), text.as_str())
                        .await;
                    if connection.is_closed() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Client closed {}", connection.id());
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error on {}: {}", connection.id(), e);
                    break;
                }
            }
        }
    }

    connection.close().await;
    state.registry.on_connection_closed(&handle);
    let _ = writer.await;
    info!("WebSocket disconnected: {}", connection.id());
}
