//! Multipart extraction for the add/update tree form.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use treeshop_core::tree::TreeInput;
use treeshop_core::upload::PendingUpload;

use crate::error::{AppError, AppResult};
use crate::views::MSG_IMAGE_TOO_LARGE;

/// Form field carrying the tree name.
pub const FIELD_NAME: &str = "treename";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_IMAGE_URL: &str = "imageUrl";
pub const FIELD_IMAGE_FILE: &str = "imageFile";

/// Content type assumed when the client sends none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Parsed tree form: text fields plus an optional, not yet stored, file.
#[derive(Debug, Default)]
pub struct TreeForm {
    pub input: TreeInput,
    pub upload: Option<PendingUpload>,
}

impl TreeForm {
    /// Drain `multipart` into a [`TreeForm`].
    ///
    /// A file field with an empty filename (no file chosen in the browser)
    /// counts as no upload. Unknown fields are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = TreeForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                FIELD_NAME => form.input.name = read_text(field).await?,
                FIELD_DESCRIPTION => form.input.description = read_text(field).await?,
                FIELD_IMAGE_URL => form.input.image_url = Some(read_text(field).await?),
                FIELD_IMAGE_FILE => {
                    let original_filename = field.file_name().unwrap_or("").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or(FALLBACK_CONTENT_TYPE)
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(multipart_error)?;

                    if !original_filename.is_empty() {
                        form.upload = Some(PendingUpload {
                            original_filename,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }
}

async fn read_text(field: Field<'_>) -> AppResult<String> {
    field.text().await.map_err(multipart_error)
}

/// Keep the body-limit case apart from malformed input.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %err, "Upload exceeds request body limit");
        AppError::PayloadTooLarge(MSG_IMAGE_TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
