//! Handlers for the tree catalog pages and form posts.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Redirect, Response};
use treeshop_core::types::DbId;

use crate::error::AppResult;
use crate::form::TreeForm;
use crate::state::AppState;
use crate::views::{render_page, TreeShopPage};

/// GET /
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let trees = state.trees.list().await?;
    render_page(StatusCode::OK, &TreeShopPage::listing(trees))
}

/// POST /add
///
/// Redirects to the catalog on success; otherwise redisplays it with the
/// error message.
pub async fn add(State(state): State<AppState>, multipart: Multipart) -> AppResult<Redirect> {
    let form = TreeForm::from_multipart(multipart).await?;
    state.trees.create(form.input, form.upload).await?;
    Ok(Redirect::to("/"))
}

/// GET /edit/{id}
///
/// Renders the catalog with the edit form for `id`, or 404 with the
/// catalog when the tree does not exist.
pub async fn edit(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let view = state.trees.get_for_edit(id).await?;
    render_page(
        StatusCode::OK,
        &TreeShopPage::editing(view.trees, view.edit_tree),
    )
}

/// POST /update/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = TreeForm::from_multipart(multipart).await?;
    state.trees.update(id, form.input, form.upload).await?;
    Ok(Redirect::to("/"))
}

/// GET /delete/{id}
///
/// Idempotent: deleting a missing tree still redirects to the catalog.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Redirect> {
    state.trees.delete(id).await?;
    Ok(Redirect::to("/"))
}

/// GET /reset
pub async fn reset(State(state): State<AppState>) -> AppResult<Redirect> {
    state.trees.reset_all().await?;
    Ok(Redirect::to("/"))
}
