use axum::{Json, extract::State};
use mvg_core::{BoardConfig, RenderOutput};
use std::sync::Arc;

use crate::AppState;

/// Get the latest render output of the board
pub async fn get_board(State(app_state): State<Arc<AppState>>) -> Json<RenderOutput> {
    let output = app_state.board.borrow().clone();
    Json(output)
}

/// Get the board configuration
pub async fn get_board_config(State(app_state): State<Arc<AppState>>) -> Json<BoardConfig> {
    tracing::info!("Getting board configuration");
    let engine = app_state.engine.lock().await;
    Json(engine.get_config().clone())
}
