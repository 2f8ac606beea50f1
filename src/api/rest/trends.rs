//! Trend endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

use super::{ApiError, EventQueryParams};
use crate::api::state::AppState;
use crate::types::Timeframe;

fn parse_timeframe(value: &str) -> Result<Timeframe, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_timeframe("timeframe must be one of: daily, weekly, monthly"))
}

/// GET /api/v1/trends - Event counts per time bucket
///
/// `timeframe`, `startDate` and `endDate` are required.
pub async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if params.timeframe().is_empty() || params.start().is_empty() || params.end().is_empty() {
        return ApiError::missing_parameters("timeframe, startDate, and endDate are required")
            .into_response();
    }
    let timeframe = match parse_timeframe(params.timeframe()) {
        Ok(timeframe) => timeframe,
        Err(e) => return e.into_response(),
    };
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let series = state.engine.time_series(
        timeframe,
        params.start(),
        params.end(),
        &params.companies(),
        &params.event_types(),
    );
    Json(series).into_response()
}

/// GET /api/v1/trends/multi-company - Event counts per time bucket and company
///
/// `startDate` and `endDate` are required; `timeframe` defaults to daily and
/// an empty company list means every known company.
pub async fn get_multi_company_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Response {
    if params.start().is_empty() || params.end().is_empty() {
        return ApiError::missing_parameters("startDate and endDate are required").into_response();
    }
    let timeframe = if params.timeframe().is_empty() {
        Timeframe::Daily
    } else {
        match parse_timeframe(params.timeframe()) {
            Ok(timeframe) => timeframe,
            Err(e) => return e.into_response(),
        }
    };
    if let Err(e) = params.validate_dates(state.strict_dates) {
        return e.into_response();
    }

    let mut companies = params.companies();
    if companies.is_empty() {
        companies = state.engine.all_company_names();
    }

    let series = state.engine.multi_company_time_series(
        timeframe,
        params.start(),
        params.end(),
        &companies,
        &params.event_types(),
    );
    Json(series).into_response()
}
