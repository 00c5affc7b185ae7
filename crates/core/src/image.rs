//! Image reference resolution.
//!
//! A tree's `image` column holds a *canonical image reference*: an absolute
//! `http(s)://` URL, a `/uploads/<filename>` path, or the empty string.

use crate::upload::StoredUpload;

/// URL prefix under which locally stored images are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

const EXTERNAL_SCHEMES: &[&str] = &["http://", "https://"];

/// Decide the canonical image reference for a record.
///
/// First match wins:
///
/// 1. A non-blank `url_input` starting with `http://` or `https://` is
///    returned verbatim.
/// 2. Any other non-blank `url_input` keeps only its final path segment
///    (after the last `/` or `\`) and is namespaced under [`UPLOADS_PREFIX`].
///    Input ending in a separator has no segment and counts as blank. This
///    is deliberate: a bare `/uploads/` is never stored as a reference.
/// 3. Otherwise a stored upload resolves to `/uploads/<filename>`.
/// 4. Otherwise the empty string.
///
/// # Examples
///
/// ```
/// use treeshop_core::image::resolve_image;
///
/// assert_eq!(resolve_image(Some("https://example.com/oak.png"), None), "https://example.com/oak.png");
/// assert_eq!(resolve_image(Some(r"C:\imgs\pine.jpg"), None), "/uploads/pine.jpg");
/// assert_eq!(resolve_image(None, None), "");
/// ```
pub fn resolve_image(url_input: Option<&str>, upload: Option<&StoredUpload>) -> String {
    if let Some(url) = url_input.map(str::trim).filter(|u| !u.is_empty()) {
        if is_external(url) {
            return url.to_string();
        }
        let segment = basename(url);
        if !segment.is_empty() {
            return format!("{UPLOADS_PREFIX}{segment}");
        }
    }

    match upload {
        Some(stored) => format!("{UPLOADS_PREFIX}{}", stored.filename),
        None => String::new(),
    }
}

/// Check that `image` has one of the canonical shapes.
pub fn is_canonical_image_ref(image: &str) -> bool {
    if image.is_empty() || is_external(image) {
        return true;
    }
    image
        .strip_prefix(UPLOADS_PREFIX)
        .is_some_and(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

fn is_external(url: &str) -> bool {
    EXTERNAL_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Final path segment, treating both `/` and `\` as separators.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
