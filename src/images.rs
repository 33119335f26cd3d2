//! Opaque image references.
//!
//! The stores never decode image bytes. An [`ImageRef`] is either a
//! root-relative asset path (`/image/act1.png`) or an inline data URI
//! produced by the upload layer; both are carried as-is and only the
//! path form is ever rewritten (by the portfolio schema migration).

use serde::{Deserialize, Serialize};

/// Root prefix for path-form image references.
pub const IMAGE_ROOT: &str = "/image/";

/// An opaque reference to an image asset.
///
/// Serializes as a plain string so persisted documents keep the shape the
/// original deployment wrote (`"images": ["/image/act1.png"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for inline `data:` URIs (self-contained, never rewritten).
    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Return the reference with the `/image/` root applied if missing.
    pub fn normalized(&self) -> Self {
        Self(normalize_image_path(&self.0))
    }
}

impl From<&str> for ImageRef {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rewrite a path-form image reference to carry the `/image/` root.
///
/// Rules (idempotent):
/// - empty strings, `data:` URIs and already-rooted paths pass through;
/// - `image/foo.png` gains only the leading slash;
/// - any other bare filename gains the full `/image/` prefix.
pub fn normalize_image_path(raw: &str) -> String {
    if raw.is_empty() || raw.starts_with('/') || raw.starts_with("data:") {
        return raw.to_string();
    }
    if let Some(rest) = raw.strip_prefix("image/") {
        return format!("{IMAGE_ROOT}{rest}");
    }
    format!("{IMAGE_ROOT}{raw}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_filename_gains_root() {
        assert_eq!(normalize_image_path("act1.png"), "/image/act1.png");
    }

    #[test]
    fn test_unrooted_image_dir_gains_slash() {
        assert_eq!(normalize_image_path("image/act1.png"), "/image/act1.png");
    }

    #[test]
    fn test_rooted_path_unchanged() {
        assert_eq!(normalize_image_path("/image/act1.png"), "/image/act1.png");
    }

    #[test]
    fn test_data_uri_unchanged() {
        let uri = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(normalize_image_path(uri), uri);
    }

    #[test]
    fn test_empty_unchanged() {
        assert_eq!(normalize_image_path(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["act1.png", "image/act1.png", "/image/act1.png", "data:x"] {
            let once = normalize_image_path(raw);
            assert_eq!(normalize_image_path(&once), once);
        }
    }

    #[test]
    fn test_image_ref_roundtrips_as_plain_string() {
        let json = serde_json::to_string(&ImageRef::new("/image/a.png")).unwrap();
        assert_eq!(json, "\"/image/a.png\"");
        let back: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "/image/a.png");
    }
}
