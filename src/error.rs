use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::db::is_integrity_violation;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("401 Unauthorized")]
    Unauthorized,

    #[error("422 Unprocessable Entity")]
    Unprocessable,

    #[error("400 Bad Request")]
    BadRequest(#[from] JsonRejection),

    #[error("500 Internal Server Error")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Integrity violations may arrive wrapped in context, so look through it.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<sqlx::Error>() {
            Some(db_err) if is_integrity_violation(db_err) => AppError::Unprocessable,
            _ => AppError::Internal(err),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        anyhow::Error::from(err).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(e) => error!(error = ?e, "request failed"),
            AppError::BadRequest(rejection) => {
                warn!(%status, reason = %rejection.body_text(), "bad request")
            }
            _ => warn!(%status, "request rejected"),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
