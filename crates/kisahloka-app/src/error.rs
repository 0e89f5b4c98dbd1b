use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::IntoResponse,
    Json,
};
use http::StatusCode;
use tracing::error;

use crate::rest_api::Envelope;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Invalid data: {0}")]
    ValidationFailed(String),

    #[error(transparent)]
    DatabaseError(kisahloka_dal::Error),
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(value: $rejection) -> Self {
                    ApiError::Rejected {
                        status: value.status(),
                        message: value.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, QueryRejection, PathRejection);

impl From<garde::Report> for ApiError {
    fn from(value: garde::Report) -> Self {
        ApiError::ValidationFailed(value.to_string().trim().to_string())
    }
}

impl From<kisahloka_dal::Error> for ApiError {
    fn from(value: kisahloka_dal::Error) -> Self {
        match value {
            kisahloka_dal::Error::RecordNotFound(entity) => ApiError::ResourceNotFound(entity),
            e @ kisahloka_dal::Error::PageOutOfRange { .. } => ApiError::InvalidQuery(e.to_string()),
            e => ApiError::DatabaseError(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (status, Json(Envelope::<()>::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dal_errors_map_to_status() {
        let not_found: ApiError = kisahloka_dal::Error::RecordNotFound("Story".to_string()).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Story not found");

        let out_of_range: ApiError = kisahloka_dal::Error::PageOutOfRange {
            page: 4,
            total_pages: 3,
        }
        .into();
        assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);
        assert!(out_of_range.to_string().contains("exceeds total number of pages (3)"));

        let db: ApiError = kisahloka_dal::Error::DatabaseError(kisahloka_dal::SqlxError::RowNotFound)
            .into();
        assert_eq!(db.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_report_is_unprocessable() {
        let mut report = garde::Report::new();
        report.append(garde::Path::new("genre_name"), garde::Error::new("length is lower than 1"));
        let err: ApiError = report.into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("genre_name: length is lower than 1"));
    }
}
