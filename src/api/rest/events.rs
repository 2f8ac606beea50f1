//! Event listing endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::EventQueryParams;
use crate::api::state::AppState;
use crate::types::{
    DateRange, PaginationInfo, PaginationRequest, SearchFilters, SearchRequest, UsageEvent,
};

/// Response for GET /api/v1/events
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<UsageEvent>,
    pub pagination: PageDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<PaginationInfo> for PageDetails {
    fn from(info: PaginationInfo) -> Self {
        Self {
            current_page: info.page,
            total_pages: info.total_pages,
            total_items: info.total,
            page_size: info.page_size,
            has_next: info.page < info.total_pages,
            has_prev: info.page > 1,
        }
    }
}

/// GET /api/v1/events - Search and filter events
///
/// The date range only applies when both `startDate` and `endDate` are given.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let request = SearchRequest {
        search_query: params.search_query().to_string(),
        filters: SearchFilters {
            date_range: DateRange::from_bounds(params.start(), params.end()),
            companies: params.companies_or_single(),
            event_types: Vec::new(),
        },
        pagination: PaginationRequest::new(params.page(), params.page_size()),
    };

    let response = state.engine.search_events(&request);

    Json(EventsResponse {
        events: response.data,
        pagination: response.pagination.into(),
    })
    .into_response()
}

/// GET /api/v1/events/metrics - Summary figures for the filtered listing
pub async fn event_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let metrics = state.engine.filtered_metrics(
        params.start(),
        params.end(),
        &params.companies_or_single(),
    );
    Json(metrics).into_response()
}
