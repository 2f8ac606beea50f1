//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{analytics, events, trends};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Dashboard is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new()
        .route("/events", get(events::list_events))
        .route("/events/metrics", get(events::event_metrics))
        .route("/trends", get(trends::get_trends))
        .route("/trends/multi-company", get(trends::get_multi_company_trends))
        .route("/metrics", get(analytics::get_metrics))
        .route("/companies", get(analytics::list_companies))
        .route("/event-types", get(analytics::event_distribution))
        .route("/analytics/companies", get(analytics::top_active_companies))
        .route("/analytics/event-distribution", get(analytics::event_distribution))
        .route("/analytics/top-events", get(analytics::top_events))
        .route("/analytics/active-users", get(analytics::active_users))
        .route("/analytics/top-endpoints", get(analytics::top_endpoints))
        .route("/analytics/top-companies", get(analytics::top_companies));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", v1)
        .layer(cors)
        .with_state(state)
}

/// Service description and endpoint map
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Analytics Dashboard API",
        "version": crate::VERSION,
        "endpoints": {
            "health": "/health",
            "events": "/api/v1/events",
            "trends": "/api/v1/trends",
            "metrics": "/api/v1/metrics",
            "companies": "/api/v1/companies",
            "event_types": "/api/v1/event-types",
            "analytics": "/api/v1/analytics",
        },
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Analytics Dashboard API is running",
        "totalEvents": state.engine.total_events(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::{engine, ACME_ROWS};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn app(strict_dates: bool) -> Router {
        let state = AppState::new(engine(ACME_ROWS)).with_strict_dates(strict_dates);
        create_router(Arc::new(state))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_json(app(false), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["totalEvents"], 2);
    }

    #[tokio::test]
    async fn test_events_pagination_shape() {
        let (status, body) = get_json(app(false), "/api/v1/events?query=ACME&pageSize=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"].as_array().unwrap().len(), 1);
        assert_eq!(body["events"][0]["companyName"], "Acme");
        assert_eq!(body["pagination"]["totalItems"], 2);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["pagination"]["hasNext"], true);
        assert_eq!(body["pagination"]["hasPrev"], false);
    }

    #[tokio::test]
    async fn test_trends_requires_parameters() {
        let (status, body) = get_json(app(false), "/api/v1/trends?timeframe=daily").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_PARAMETERS");

        let (status, body) = get_json(
            app(false),
            "/api/v1/trends?timeframe=hourly&startDate=2024-01-01&endDate=2024-01-02",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_TIMEFRAME");
    }

    #[tokio::test]
    async fn test_trends_daily() {
        let (status, body) = get_json(
            app(false),
            "/api/v1/trends?timeframe=daily&startDate=2024-01-01&endDate=2024-01-02",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timeframe"], "daily");
        assert_eq!(body["totalPoints"], 2);
        assert_eq!(body["data"][0]["timestamp"], "2024-01-01");
        assert_eq!(body["data"][0]["eventType"], "Action");
    }

    #[tokio::test]
    async fn test_multi_company_defaults() {
        let (status, body) = get_json(
            app(false),
            "/api/v1/trends/multi-company?startDate=2024-01-01&endDate=2024-01-02",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timeframe"], "daily");
        assert_eq!(body["data"][0]["Acme"], 1);
    }

    #[tokio::test]
    async fn test_strict_dates() {
        let uri = "/api/v1/metrics?startDate=yesterday&endDate=2024-01-02";

        let (status, body) = get_json(app(true), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_DATE");

        let (status, body) = get_json(app(false), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalEvents"], 2);
    }

    #[tokio::test]
    async fn test_ranking_envelope() {
        let (status, body) = get_json(app(false), "/api/v1/analytics/top-events?limit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
