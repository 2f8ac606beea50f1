//! Metrics, listings and ranking endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

use super::EventQueryParams;
use crate::api::state::AppState;
use crate::types::ListResponse;

/// GET /api/v1/metrics - Totals, active companies and event-type ranking
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let metrics = state.engine.metrics(
        params.start(),
        params.end(),
        &params.companies(),
        &params.event_types(),
    );
    Json(metrics).into_response()
}

/// GET /api/v1/companies - Every company with its event count
pub async fn list_companies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.companies())
}

/// GET /api/v1/event-types and /api/v1/analytics/event-distribution
pub async fn event_distribution(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.event_distribution())
}

/// GET /api/v1/analytics/companies - Five busiest companies overall
pub async fn top_active_companies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.top_active_companies())
}

/// GET /api/v1/analytics/top-events
pub async fn top_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let ranking = state.engine.top_events_by_volume(
        params.start(),
        params.end(),
        &params.companies(),
        params.limit(),
    );
    Json(ListResponse::new(ranking)).into_response()
}

/// GET /api/v1/analytics/active-users
pub async fn active_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let ranking = state.engine.most_active_users(
        params.start(),
        params.end(),
        &params.companies(),
        params.limit(),
    );
    Json(ListResponse::new(ranking)).into_response()
}

/// GET /api/v1/analytics/top-endpoints
pub async fn top_endpoints(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let ranking = state.engine.top_endpoints_by_usage(
        params.start(),
        params.end(),
        &params.companies(),
        params.limit(),
    );
    Json(ListResponse::new(ranking)).into_response()
}

/// GET /api/v1/analytics/top-companies - Company ranking with date/company filters
pub async fn top_companies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let ranking = state.engine.top_active_companies_filtered(
        params.start(),
        params.end(),
        &params.companies(),
        params.limit(),
    );
    Json(ListResponse::new(ranking)).into_response()
}
