//! Mapping of domain errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fluxo_core::reconcile::ReportError;
use fluxo_db::{PipelineError, ReceiptError, StoreError};
use fluxo_shared::AppError;
use serde_json::json;

/// Handler error rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self(AppError::NotFound(err.to_string())),
            _ => Self(AppError::Store(err.to_string())),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(AppError::Store(err.to_string()))
    }
}

impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::BlankStatus => Self(AppError::Validation(err.to_string())),
            ReceiptError::NotFound(_) => Self(AppError::NotFound(err.to_string())),
            ReceiptError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fluxo_db::Stage;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::from(ReportError::UnknownView("x".into())), StatusCode::BAD_REQUEST)]
    #[case(
        ApiError::from(ReportError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }),
        StatusCode::BAD_REQUEST
    )]
    #[case(ApiError::from(ReceiptError::BlankStatus), StatusCode::BAD_REQUEST)]
    #[case(
        ApiError::from(ReceiptError::NotFound(fluxo_shared::types::ReceiptId::new(9))),
        StatusCode::NOT_FOUND
    )]
    #[case(
        ApiError::from(PipelineError {
            stage: Stage::Movements,
            source: StoreError::InvalidRequest("x".into()),
        }),
        StatusCode::BAD_GATEWAY
    )]
    #[case(ApiError(AppError::Superseded("x".into())), StatusCode::CONFLICT)]
    #[case(ApiError(AppError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED)]
    fn test_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }
}
