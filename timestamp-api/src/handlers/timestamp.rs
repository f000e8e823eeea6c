use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::api::{ApiError, TimestampResult};
use crate::metrics_middleware::report_conversion;
use crate::normalize::{normalize_with, InputKind};
use crate::router::AppState;

/// `GET /api`: the current time.
pub async fn current_timestamp(
    State(state): State<AppState>,
) -> Result<Json<TimestampResult>, ApiError> {
    convert(&state, None)
}

/// `GET /api/:date`: the instant named by `date`, either epoch milliseconds
/// or a date string.
pub async fn parse_timestamp(
    State(state): State<AppState>,
    date: Result<Path<String>, PathRejection>,
) -> Result<Json<TimestampResult>, ApiError> {
    // A segment that doesn't percent-decode to UTF-8 can't be a date either
    let Path(date) = date.map_err(|err| {
        debug!("rejected date segment: {}", err);
        ApiError::InvalidDate
    })?;

    convert(&state, Some(date.as_str()))
}

fn convert(state: &AppState, input: Option<&str>) -> Result<Json<TimestampResult>, ApiError> {
    let kind = InputKind::classify(input);
    let result = normalize_with(state.timesource.as_ref(), input);
    report_conversion(kind, result.is_ok());

    match &result {
        Ok(converted) => debug!(
            input = ?input,
            kind = kind.as_str(),
            unix = converted.unix,
            "converted timestamp"
        ),
        Err(_) => debug!(input = ?input, kind = kind.as_str(), "invalid date"),
    }

    Ok(Json(result?))
}
