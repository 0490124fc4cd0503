//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::planner::{Engine, SearchError};
use crate::query::QueryError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/flights/summary", get(summary))
        .route("/flights/query", post(query_flights))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Counts and time span of the loaded schedule.
async fn summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(SummaryResponse::from_summary(&state.table.summary()))
}

/// Run one schedule query.
async fn query_flights(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: QueryRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "Unparseable query body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;
    let spec = req.to_spec()?;

    // The search is CPU-bound; keep it off the async workers.
    let table = Arc::clone(&state.table);
    let config = Arc::clone(&state.config);
    let response = tokio::task::spawn_blocking(move || {
        Engine::new(&table, &config)
            .run(&spec)
            .map(|outcome| QueryResponse::from_outcome(&outcome))
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("query task failed: {e}"),
    })??;

    Ok(Json(response))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        message: format!("no route for {uri}"),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::*;
    use crate::planner::SearchConfig;
    use crate::schedule::ScheduleTable;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(
            ScheduleTable::from_legs(vec![
                leg("BA", "KJFK", "EGLL", "0800", 420),
                leg("AA", "KJFK", "EGLL", "1000", 400),
                cargo_leg("FX", "KJFK", "EGLL", "0300", 430),
                leg("AA", "KJFK", "KORD", "0600", 150),
                leg("UA", "KORD", "KSFO", "1000", 270),
            ]),
            SearchConfig::new(2, 0, 100),
        )
    }

    fn body(value: serde_json::Value) -> Bytes {
        Bytes::from(serde_json::to_vec(&value).unwrap())
    }

    fn query(dest: &str, stops: serde_json::Value) -> serde_json::Value {
        json!({
            "origin_type": "airport",
            "origin_values": ["KJFK"],
            "dest_type": "airport",
            "dest_values": [dest],
            "start_date": "20230403",
            "start_time": "0000",
            "end_date": "20230404",
            "end_time": "0000",
            "airlines": ["AA", "BA", "FX", "UA"],
            "stops": stops,
        })
    }

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn summary_counts_table() {
        let Json(counts) = summary(State(state())).await;
        assert_eq!(counts.legs, 5);
        assert_eq!(counts.airports, 4);
        assert_eq!(counts.airlines, 4);
    }

    #[tokio::test]
    async fn direct_query() {
        let Json(response) = query_flights(State(state()), body(query("EGLL", json!(0))))
            .await
            .unwrap();

        assert_eq!(response.legs_matched, 3);
        assert_eq!(response.routes.len(), 3);
        assert!(response.itineraries.is_empty());
        assert!(response.routes.iter().any(|r| r[2] == "FX" && r[3] == "true"));
    }

    #[tokio::test]
    async fn connection_query() {
        let Json(response) = query_flights(State(state()), body(query("KSFO", json!("1"))))
            .await
            .unwrap();

        assert_eq!(response.itineraries.len(), 1);
        assert_eq!(response.itineraries[0].path, vec!["KJFK", "KORD", "KSFO"]);
        assert_eq!(response.legs_matched, 2);
        assert!(!response.truncated);
    }

    #[tokio::test]
    async fn bad_json_is_bad_request() {
        let err = query_flights(State(state()), Bytes::from_static(b"{not json"))
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_query_is_bad_request() {
        let mut value = query("EGLL", json!(0));
        value["start_date"] = json!("2023-13-01");
        let err = query_flights(State(state()), body(value))
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn too_many_stops_is_bad_request() {
        let err = query_flights(State(state()), body(query("KSFO", json!(3))))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest { message } => assert!(message.contains("at most 2")),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let err = not_found(Uri::from_static("/nope")).await;
        assert_eq!(status(err), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn error_body_is_json() {
        let response = AppError::Internal {
            message: "boom".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"error": "boom"}));
    }
}
