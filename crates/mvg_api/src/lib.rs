//! MVG board API Library
//!
//! This library provides the HTTP surface of a departure board: the data
//! collaborator posts notifications and collects requests, the view layer
//! reads the rendered board.

mod board;
mod notification;

use axum::{
    Router,
    routing::{get, post},
};
use mvg_core::{OutboundRequest, RenderOutput};
use mvg_engine::Engine;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tower_http::trace::TraceLayer;

pub use notification::ErrorResponse;

/// State shared by all handlers
pub struct AppState {
    engine: Mutex<Engine>,
    requests: Mutex<mpsc::UnboundedReceiver<OutboundRequest>>,
    board: watch::Receiver<RenderOutput>,
}

impl AppState {
    pub fn new(engine: Engine, requests: mpsc::UnboundedReceiver<OutboundRequest>) -> Self {
        let board = engine.subscribe();
        AppState {
            engine: Mutex::new(engine),
            requests: Mutex::new(requests),
            board,
        }
    }

    /// Give back the engine, e.g. to tear it down on shutdown
    pub fn into_engine(self) -> Engine {
        self.engine.into_inner()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/board", get(board::get_board))
        .route("/config", get(board::get_board_config))
        .route("/notifications", post(notification::post_notification))
        .route("/requests", get(notification::take_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mvg_core::{BoardConfig, Placeholder};
    use tower::util::ServiceExt;

    pub fn create_test_app() -> Router {
        Router::new().route("/health", get(health_check))
    }

    fn test_board_config() -> BoardConfig {
        BoardConfig {
            station: "Hauptbahnhof".into(),
            ..BoardConfig::default()
        }
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn get_board(app: Router) -> RenderOutput {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/board")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_integration_station_and_departures() {
        let (engine, requests) = Engine::initialize(test_board_config());
        let state = Arc::new(AppState::new(engine, requests));
        let app = create_app(state.clone());

        let board = get_board(app.clone()).await;
        assert_eq!(board.placeholder(), Some(Placeholder::Loading));

        // Resolve the station
        let response = app
            .clone()
            .oneshot(post_json(
                "/notifications",
                serde_json::json!({
                    "kind": "STATION_RESOLVED",
                    "stationNameQueried": "Hauptbahnhof",
                    "resolvedId": "de:09162:6",
                    "resolvedName": "München Hbf"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_board(app.clone()).await.header, "München Hbf");

        // Push a departure snapshot
        let now = chrono::Utc::now().timestamp_millis();
        let response = app
            .clone()
            .oneshot(post_json(
                "/notifications",
                serde_json::json!({
                    "kind": "DEPARTURES_UPDATED",
                    "stationName": "Hauptbahnhof",
                    "departures": [
                        {"label": "S1", "destination": "Freising", "product": "SBAHN",
                         "departureTime": now + 300_000, "delay": "2"}
                    ]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let board = get_board(app.clone()).await;
        assert_eq!(board.rows().len(), 1);

        // Station info and the first departure poll are queued
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/requests")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let pending: Vec<OutboundRequest> = serde_json::from_slice(&body).unwrap();
        assert!(matches!(
            pending[0],
            OutboundRequest::RequestStationInfo { .. }
        ));
        assert!(
            pending[1..]
                .iter()
                .all(|request| matches!(request, OutboundRequest::RequestDepartures { .. }))
        );

        assert!(state.engine.lock().await.is_polling());
    }
}
