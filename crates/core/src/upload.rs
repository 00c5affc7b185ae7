//! Upload policy for tree images.
//!
//! One [`UploadPolicy`] is built at startup and shared with whatever handles
//! inbound files. It decides which files are accepted, how they are named on
//! disk, and where they are written.

use std::path::{Path, PathBuf};

use chrono::Utc;
use image::ImageFormat;
use serde::Serialize;

use crate::image::basename;

/// Image extensions accepted by default.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Default on-disk directory for stored uploads, relative to the working dir.
pub const DEFAULT_UPLOADS_DIR: &str = "public/uploads";

/// Sniffed formats that are allowed through [`UploadPolicy::check_content`].
const ALLOWED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A file received from the client but not yet written to disk.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    /// Filename as sent by the client (may include directory components).
    pub original_filename: String,
    /// Declared content type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file persisted under the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Generated, disk-unique filename (no directory part).
    pub filename: String,
}

/// Machine-readable upload failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadErrorKind {
    UnsupportedMediaType,
    Io,
}

impl UploadErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedMediaType => "unsupported-media-type",
            Self::Io => "io",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported media type for '{filename}' ({content_type})")]
    UnsupportedMediaType {
        filename: String,
        content_type: String,
    },

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            Self::UnsupportedMediaType { .. } => UploadErrorKind::UnsupportedMediaType,
            Self::Io(_) => UploadErrorKind::Io,
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Accept/reject rules, naming scheme, and destination for uploaded images.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    destination: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    /// Policy accepting JPEG, PNG and GIF images, stored under `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Check the client-supplied filename and content type.
    ///
    /// Both the lowercased extension and the declared content type must
    /// name one of the allowed image types (`image/jpeg` satisfies `jpeg`).
    pub fn check(&self, original_filename: &str, content_type: &str) -> Result<(), UploadError> {
        let extension = Path::new(basename(original_filename))
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let content_type_lower = content_type.to_lowercase();

        let extension_ok = self.allowed_extensions.iter().any(|ext| *ext == extension);
        let content_type_ok = self
            .allowed_extensions
            .iter()
            .any(|ext| content_type_lower.contains(ext.as_str()));

        if extension_ok && content_type_ok {
            Ok(())
        } else {
            Err(UploadError::UnsupportedMediaType {
                filename: original_filename.to_string(),
                content_type: content_type.to_string(),
            })
        }
    }

    /// Check the file's magic bytes against the allowed image formats.
    pub fn check_content(&self, upload: &PendingUpload) -> Result<(), UploadError> {
        match image::guess_format(&upload.bytes) {
            Ok(format) if ALLOWED_FORMATS.contains(&format) => Ok(()),
            _ => Err(UploadError::UnsupportedMediaType {
                filename: upload.original_filename.clone(),
                content_type: upload.content_type.clone(),
            }),
        }
    }

    /// Generated on-disk name: `<millisecond-timestamp>-<basename>`.
    pub fn stored_filename(&self, original_filename: &str, timestamp_millis: i64) -> String {
        format!("{timestamp_millis}-{}", basename(original_filename))
    }

    /// Validate and write `upload` under the destination directory.
    ///
    /// Rejections happen before anything touches the filesystem.
    pub async fn persist(&self, upload: PendingUpload) -> Result<StoredUpload, UploadError> {
        self.check(&upload.original_filename, &upload.content_type)?;
        self.check_content(&upload)?;

        tokio::fs::create_dir_all(&self.destination).await?;

        let filename =
            self.stored_filename(&upload.original_filename, Utc::now().timestamp_millis());
        tokio::fs::write(self.destination.join(&filename), &upload.bytes).await?;

        tracing::debug!(
            filename = %filename,
            size_bytes = upload.bytes.len(),
            "Stored uploaded image"
        );

        Ok(StoredUpload { filename })
    }

    /// Remove a previously stored upload whose record was never written.
    ///
    /// Failures are logged, not returned: the caller is already on an
    /// error path.
    pub async fn discard(&self, stored: &StoredUpload) {
        let path = self.destination.join(&stored.filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(filename = %stored.filename, "Discarded uploaded image"),
            Err(e) => tracing::warn!(
                filename = %stored.filename,
                error = %e,
                "Failed to discard uploaded image"
            ),
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOADS_DIR)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
