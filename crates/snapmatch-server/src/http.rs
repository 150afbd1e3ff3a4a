//! HTTP routes: room creation, room status, and health.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use snapmatch_protocol::RoomCode;

use crate::hub::ws_handler;
use crate::AppState;

/// Builds the full application router, WebSocket route included.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/:code/status", get(room_status))
        .route("/ws/:code", get(ws_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomQuery {
    #[serde(default)]
    solo: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    room_code: RoomCode,
}

#[derive(Debug, Serialize)]
pub struct RoomStatusResponse {
    exists: bool,
}

async fn health() -> &'static str {
    "ok"
}

async fn create_room(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateRoomQuery>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), StatusCode> {
    let mut registry = state.registry.lock().await;
    match registry.create_room(query.solo) {
        Ok(handle) => Ok((
            StatusCode::CREATED,
            Json(CreateRoomResponse {
                room_code: handle.code().clone(),
            }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "room creation failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn room_status(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> (StatusCode, Json<RoomStatusResponse>) {
    let code = RoomCode::new(code);
    let exists = state.registry.lock().await.contains(&code);
    let status = if exists {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(RoomStatusResponse { exists }))
}
