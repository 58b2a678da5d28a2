use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

use crate::domain::error::DomainError;
use crate::presentation::http::middleware::session::safe_next;
use crate::presentation::views;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("login required")]
    LoginRequired { next: String },

    #[error("not found")]
    NotFound,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

pub(crate) fn login_url(next: &str) -> String {
    match safe_next(Some(next)) {
        Some(next) if next != "/" => format!("/login/?next={next}"),
        _ => "/login/".to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::LoginRequired { next } => {
                return Redirect::to(&login_url(next)).into_response();
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, None),
            AppError::Domain(err) => match err {
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, None),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, None),
                DomainError::Validation(errors) => (StatusCode::BAD_REQUEST, Some(errors.to_string())),
                DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, Some(err.to_string())),
                DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, None),
                DomainError::Unexpected(message) => {
                    error!(error = %message, "unexpected domain error");
                    (StatusCode::INTERNAL_SERVER_ERROR, None)
                }
            },
            AppError::Internal(err) => {
                error!(error = ?err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        (status, views::errors::error_page(status, detail.as_deref())).into_response()
    }
}
