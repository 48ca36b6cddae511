//! Extension catalog
//!
//! Ordered mapping from a content-type label to the extensions rendered inline
//! under it. Categories are scanned in declaration order and the first match wins.

use std::sync::OnceLock;

/// Label of the category whose MIME type is resolved from file content
pub const IMAGE_LABEL: &str = "image";

static STANDARD: OnceLock<ExtensionCatalog> = OnceLock::new();

/// Content category a file extension belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCategory {
    /// Image; the concrete MIME type comes from the file signature
    Image,
    /// Any other category; the label is the MIME type
    Mime(String),
}

impl ContentCategory {
    pub fn from_label(label: &str) -> Self {
        if label == IMAGE_LABEL {
            Self::Image
        } else {
            Self::Mime(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Image => IMAGE_LABEL,
            Self::Mime(mime) => mime,
        }
    }
}

/// One catalog row: a category and the lowercase extensions it covers
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: ContentCategory,
    pub extensions: Vec<String>,
}

/// Immutable, ordered extension catalog
#[derive(Debug, Clone, Default)]
pub struct ExtensionCatalog {
    entries: Vec<CatalogEntry>,
}

impl ExtensionCatalog {
    /// Empty catalog; every file falls through to download
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a category after the existing ones
    ///
    /// Extensions are stored lowercase without a leading dot.
    #[must_use]
    pub fn with_category(mut self, label: &str, extensions: &[&str]) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self.entries.push(CatalogEntry {
            category: ContentCategory::from_label(label),
            extensions,
        });
        self
    }

    /// Process-wide default catalog, built on first use
    pub fn standard() -> &'static Self {
        STANDARD.get_or_init(Self::build_standard)
    }

    fn build_standard() -> Self {
        Self::empty()
            .with_category(
                IMAGE_LABEL,
                &["jpg", "jpeg", "gif", "png", "bmp", "ico", "tif", "tiff", "webp", "svg"],
            )
            .with_category("application/pdf", &["pdf"])
            // Text
            .with_category("text/html", &["htm", "html"])
            .with_category("text/plain", &["txt", "info", "json", "map"])
            .with_category("text/css", &["css"])
            .with_category("application/javascript", &["js"])
            // Audio
            .with_category("audio/mpeg", &["mp3"])
            .with_category("audio/wav", &["wav"])
            .with_category("audio/flac", &["flac"])
            .with_category("video/ogg", &["ogg"])
            // Video
            .with_category("video/webm", &["webm"])
            .with_category("video/mp4", &["mp4"])
    }

    /// Find the first category covering `extension` (case-insensitive)
    ///
    /// # Examples
    /// ```
    /// use file_render::render::{ContentCategory, ExtensionCatalog};
    /// let catalog = ExtensionCatalog::standard();
    /// assert_eq!(catalog.classify("PNG"), Some(&ContentCategory::Image));
    /// assert_eq!(catalog.classify("css").map(ContentCategory::label), Some("text/css"));
    /// assert_eq!(catalog.classify("exe"), None);
    /// ```
    pub fn classify(&self, extension: &str) -> Option<&ContentCategory> {
        let extension = extension.trim_start_matches('.');
        self.entries
            .iter()
            .find(|entry| {
                entry
                    .extensions
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(extension))
            })
            .map(|entry| &entry.category)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let labels: Vec<&str> = ExtensionCatalog::standard()
            .entries()
            .iter()
            .map(|e| e.category.label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "image",
                "application/pdf",
                "text/html",
                "text/plain",
                "text/css",
                "application/javascript",
                "audio/mpeg",
                "audio/wav",
                "audio/flac",
                "video/ogg",
                "video/webm",
                "video/mp4",
            ]
        );
    }

    #[test]
    fn test_classify_known() {
        let catalog = ExtensionCatalog::standard();
        for ext in ["jpg", "jpeg", "gif", "png", "bmp", "ico", "tif", "tiff", "webp", "svg"] {
            assert_eq!(catalog.classify(ext), Some(&ContentCategory::Image), "{ext}");
        }
        let cases = [
            ("pdf", "application/pdf"),
            ("htm", "text/html"),
            ("html", "text/html"),
            ("txt", "text/plain"),
            ("json", "text/plain"),
            ("css", "text/css"),
            ("js", "application/javascript"),
            ("mp3", "audio/mpeg"),
            ("wav", "audio/wav"),
            ("flac", "audio/flac"),
            ("ogg", "video/ogg"),
            ("webm", "video/webm"),
            ("mp4", "video/mp4"),
        ];
        for (ext, label) in cases {
            assert_eq!(catalog.classify(ext).map(ContentCategory::label), Some(label));
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        let catalog = ExtensionCatalog::standard();
        assert_eq!(catalog.classify("JPG"), Some(&ContentCategory::Image));
        assert_eq!(
            catalog.classify("Html").map(ContentCategory::label),
            Some("text/html")
        );
    }

    #[test]
    fn test_classify_unknown() {
        let catalog = ExtensionCatalog::standard();
        assert_eq!(catalog.classify("zip"), None);
        assert_eq!(catalog.classify(""), None);
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = ExtensionCatalog::empty()
            .with_category("text/plain", &["log"])
            .with_category("application/x-log", &[".LOG"]);
        assert_eq!(
            catalog.classify("log").map(ContentCategory::label),
            Some("text/plain")
        );
    }

    #[test]
    fn test_standard_is_shared() {
        assert!(std::ptr::eq(
            ExtensionCatalog::standard(),
            ExtensionCatalog::standard()
        ));
    }
}
