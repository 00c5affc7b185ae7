//! Server-rendered HTML pages.
//!
//! Templates live in `crates/api/templates` and are compiled in by askama.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use treeshop_core::error::CoreError;
use treeshop_core::tree::{Rejection, Tree};
use treeshop_core::upload::UploadErrorKind;

use crate::error::{AppError, AppResult};

/// Shown when an upload fails the image-only policy.
pub const MSG_IMAGES_ONLY: &str = "Images only: please upload a JPEG, PNG or GIF file.";

/// Shown for a filesystem failure carried as an upload error. The lifecycle
/// reports write failures as storage errors with a flow-specific message, so
/// this only covers callers that pass an [`UploadError`] through unchanged.
///
/// [`UploadError`]: treeshop_core::upload::UploadError
pub const MSG_IMAGE_NOT_STORED: &str = "The image could not be stored.";

/// Shown when the request body exceeds the configured upload limit.
pub const MSG_IMAGE_TOO_LARGE: &str = "Image too large.";

/// Shown when an edit or update targets a record that does not exist.
pub const MSG_TREE_NOT_FOUND: &str = "Tree not found.";

/// The catalog page: record list plus the add or edit form.
#[derive(Debug, Template)]
#[template(path = "treeshop.html")]
pub struct TreeShopPage {
    pub trees: Vec<Tree>,
    pub edit_tree: Option<Tree>,
    pub error: Option<String>,
}

impl TreeShopPage {
    pub fn listing(trees: Vec<Tree>) -> Self {
        Self {
            trees,
            edit_tree: None,
            error: None,
        }
    }

    pub fn editing(trees: Vec<Tree>, edit_tree: Tree) -> Self {
        Self {
            trees,
            edit_tree: Some(edit_tree),
            error: None,
        }
    }

    /// Redisplay after a recoverable failure.
    pub fn rejected(rejection: Rejection) -> (StatusCode, Self) {
        let status = rejection_status(&rejection.error);
        let page = Self {
            error: Some(rejection_message(&rejection.error)),
            trees: rejection.trees,
            edit_tree: rejection.edit_tree,
        };
        (status, page)
    }
}

#[derive(Debug, Template)]
#[template(path = "about.html")]
pub struct AboutPage;

#[derive(Debug, Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub message: String,
}

/// Render `page` with `status`, or fail with an internal error.
pub fn render_page<T: Template>(status: StatusCode, page: &T) -> AppResult<Response> {
    let html = page
        .render()
        .map_err(|e| AppError::InternalError(format!("Template render failed: {e}")))?;
    Ok((status, Html(html)).into_response())
}

/// User-facing text for a rejected operation.
pub fn rejection_message(error: &CoreError) -> String {
    match error {
        CoreError::NotFound { .. } => MSG_TREE_NOT_FOUND.to_string(),
        CoreError::Validation(msg) | CoreError::Storage(msg) => msg.clone(),
        CoreError::Upload(err) => match err.kind() {
            UploadErrorKind::UnsupportedMediaType => MSG_IMAGES_ONLY.to_string(),
            UploadErrorKind::Io => MSG_IMAGE_NOT_STORED.to_string(),
        },
    }
}

/// HTTP status used when redisplaying the form after a rejection.
pub fn rejection_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Upload(err) => match err.kind() {
            UploadErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
        },
        CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use treeshop_core::tree::{MSG_FIELDS_REQUIRED, MSG_UPDATE_FAILED};
    use treeshop_core::upload::UploadError;

    use super::*;

    fn tree(id: i64, name: &str, image: &str) -> Tree {
        Tree {
            id,
            name: name.to_string(),
            description: format!("{name} description"),
            image: image.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn listing_renders_each_tree() {
        let page = TreeShopPage::listing(vec![
            tree(1, "Oak", "https://example.com/oak.png"),
            tree(2, "Pine", ""),
        ]);
        let html = page.render().unwrap();

        assert!(html.contains("Oak"));
        assert!(html.contains("Pine"));
        assert!(html.contains("oak.png"));
        assert!(html.contains(r#"href="/edit/2""#));
        assert!(html.contains(r#"action="/add""#));
    }

    #[test]
    fn editing_targets_update_route() {
        let oak = tree(7, "Oak", "/uploads/old.png");
        let html = TreeShopPage::editing(vec![oak.clone()], oak).render().unwrap();

        assert!(html.contains(r#"action="/update/7""#));
        assert!(!html.contains(r#"action="/add""#));
    }

    #[test]
    fn names_are_html_escaped() {
        let html = TreeShopPage::listing(vec![tree(1, "<script>", "")])
            .render()
            .unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(
            rejection_message(&CoreError::Validation(MSG_FIELDS_REQUIRED.into())),
            MSG_FIELDS_REQUIRED
        );
        assert_eq!(
            rejection_message(&CoreError::Storage(MSG_UPDATE_FAILED.into())),
            MSG_UPDATE_FAILED
        );
        assert_eq!(
            rejection_message(&CoreError::NotFound { entity: "Tree", id: 3 }),
            MSG_TREE_NOT_FOUND
        );
        let upload = UploadError::UnsupportedMediaType {
            filename: "a.txt".into(),
            content_type: "text/plain".into(),
        };
        assert_eq!(rejection_message(&CoreError::Upload(upload)), MSG_IMAGES_ONLY);
    }

    #[test]
    fn upload_io_error_is_flow_neutral() {
        let io = UploadError::Io(std::io::Error::other("disk full"));
        let error = CoreError::Upload(io);
        assert_eq!(rejection_message(&error), MSG_IMAGE_NOT_STORED);
        assert_eq!(rejection_status(&error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejection_statuses() {
        assert_eq!(
            rejection_status(&CoreError::Validation(String::new())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            rejection_status(&CoreError::NotFound { entity: "Tree", id: 1 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            rejection_status(&CoreError::Storage(String::new())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rejected_page_keeps_list_and_target() {
        let oak = tree(1, "Oak", "");
        let (status, page) = TreeShopPage::rejected(Rejection {
            error: CoreError::Validation(MSG_FIELDS_REQUIRED.into()),
            trees: vec![oak.clone()],
            edit_tree: Some(oak),
        });

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(page.error.as_deref(), Some(MSG_FIELDS_REQUIRED));
        assert_eq!(page.trees.len(), 1);
        assert!(page.edit_tree.is_some());
    }
}
