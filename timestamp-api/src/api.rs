use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single instant, as epoch milliseconds and as an HTTP date in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimestampResult {
    pub unix: i64,
    pub utc: String,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Invalid Date")]
    InvalidDate,
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid Date")]
    InvalidDate,
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error")]
    Internal,
}

impl From<TimestampError> for ApiError {
    fn from(error: TimestampError) -> Self {
        match error {
            TimestampError::InvalidDate => ApiError::InvalidDate,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Existing clients expect invalid dates to come back as a 200.
        let status = match self {
            ApiError::InvalidDate => StatusCode::OK,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_result_fields() {
        let result = TimestampResult {
            unix: 1451001600000,
            utc: "Fri, 25 Dec 2015 00:00:00 GMT".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"unix": 1451001600000i64, "utc": "Fri, 25 Dec 2015 00:00:00 GMT"})
        );
    }

    #[test]
    fn error_statuses() {
        assert_eq!(ApiError::InvalidDate.into_response().status(), StatusCode::OK);
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_date_converts() {
        assert_eq!(ApiError::from(TimestampError::InvalidDate), ApiError::InvalidDate);
        assert_eq!(TimestampError::InvalidDate.to_string(), "Invalid Date");
    }
}
