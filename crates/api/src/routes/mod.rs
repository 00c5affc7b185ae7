pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{pages, trees};
use crate::state::AppState;

/// Build the catalog route tree.
///
/// ```text
/// GET    /                 -> list
/// POST   /add              -> add
/// GET    /edit/{id}        -> edit
/// POST   /update/{id}      -> update
/// GET    /delete/{id}      -> delete
/// GET    /reset            -> reset
/// GET    /about            -> about
/// ```
pub fn tree_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(trees::list))
        .route("/add", post(trees::add))
        .route("/edit/{id}", get(trees::edit))
        .route("/update/{id}", post(trees::update))
        .route("/delete/{id}", get(trees::delete))
        .route("/reset", get(trees::reset))
        .route("/about", get(pages::about))
}
