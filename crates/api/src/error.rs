use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use treeshop_core::tree::{LifecycleError, Rejection};

use crate::views::{ErrorPage, TreeShopPage};

/// Application-level error type for HTTP handlers.
///
/// Recoverable lifecycle failures re-render the catalog page with a message;
/// everything else becomes a generic HTML error page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A recoverable failure; the form is redisplayed.
    #[error(transparent)]
    Rejected(Rejection),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LifecycleError<sqlx::Error>> for AppError {
    fn from(err: LifecycleError<sqlx::Error>) -> Self {
        match err {
            LifecycleError::Rejected(rejection) => Self::Rejected(rejection),
            LifecycleError::Storage(db) => Self::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Rejected(rejection) => {
                let (status, page) = TreeShopPage::rejected(rejection);
                return match page.render() {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to render catalog page");
                        internal_error_page()
                    }
                };
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        error_page(status, message)
    }
}

fn error_page(status: StatusCode, message: String) -> Response {
    let page = ErrorPage {
        status: status.as_u16(),
        message,
    };
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, page.message).into_response(),
    }
}

fn internal_error_page() -> Response {
    error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}
