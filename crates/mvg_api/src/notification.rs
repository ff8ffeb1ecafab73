use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use mvg_core::{NotificationError, OutboundRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

fn notification_error_to_response(error: NotificationError) -> impl IntoResponse {
    let message = match &error {
        NotificationError::UnknownKind { kind } => format!("Unknown notification kind '{}'", kind),
        NotificationError::Malformed { .. } => error.to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

/// Hand a notification from the data collaborator to the board
pub async fn post_notification(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let mut engine = app_state.engine.lock().await;
    match engine.on_raw_message(payload) {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(error) => notification_error_to_response(error).into_response(),
    }
}

/// Drain the requests the board queued for the data collaborator
pub async fn take_requests(State(app_state): State<Arc<AppState>>) -> Json<Vec<OutboundRequest>> {
    let mut requests = app_state.requests.lock().await;
    let mut pending = Vec::new();
    while let Ok(request) = requests.try_recv() {
        pending.push(request);
    }
    tracing::debug!("Handing out {} pending requests", pending.len());
    Json(pending)
}
