//! Static pages.

use axum::http::StatusCode;
use axum::response::Response;

use crate::error::AppResult;
use crate::views::{render_page, AboutPage};

/// GET /about
pub async fn about() -> AppResult<Response> {
    render_page(StatusCode::OK, &AboutPage)
}
