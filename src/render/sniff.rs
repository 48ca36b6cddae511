//! Image signature detection
//!
//! Determines an image's real format from its leading bytes instead of trusting
//! the file extension.

/// Number of leading bytes read for signature detection
pub const SNIFF_LEN: usize = 512;

/// Image formats recognised by their signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Gif,
    Jpeg,
    Png,
    Bmp,
    Ico,
    Tiff,
    Webp,
    Psd,
    Jpeg2000,
    Avif,
    Svg,
}

impl ImageFormat {
    /// MIME Content-Type for this format
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/vnd.microsoft.icon",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::Psd => "image/psd",
            Self::Jpeg2000 => "image/jp2",
            Self::Avif => "image/avif",
            Self::Svg => "image/svg+xml",
        }
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JP2_SIGNATURE: &[u8] = b"\x00\x00\x00\x0cjP  \r\n\x87\n";

/// Detect the image format of `head`, the first bytes of a file
///
/// # Examples
/// ```
/// use file_render::render::sniff::{detect_image_format, ImageFormat};
/// assert_eq!(detect_image_format(b"\x89PNG\r\n\x1a\n...."), Some(ImageFormat::Png));
/// assert_eq!(detect_image_format(b"GIF89a"), Some(ImageFormat::Gif));
/// assert_eq!(detect_image_format(b"plain text"), None);
/// ```
pub fn detect_image_format(head: &[u8]) -> Option<ImageFormat> {
    if head.starts_with(PNG_SIGNATURE) {
        return Some(ImageFormat::Png);
    }
    if head.starts_with(b"\xff\xd8\xff") {
        return Some(ImageFormat::Jpeg);
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    if head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP" {
        return Some(ImageFormat::Webp);
    }
    if head.starts_with(b"II*\x00") || head.starts_with(b"MM\x00*") {
        return Some(ImageFormat::Tiff);
    }
    if head.starts_with(b"\x00\x00\x01\x00") {
        return Some(ImageFormat::Ico);
    }
    if head.starts_with(b"8BPS") {
        return Some(ImageFormat::Psd);
    }
    if head.starts_with(JP2_SIGNATURE) {
        return Some(ImageFormat::Jpeg2000);
    }
    if head.len() >= 12 && &head[4..8] == b"ftyp" && matches!(&head[8..12], b"avif" | b"avis") {
        return Some(ImageFormat::Avif);
    }
    if head.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }
    if looks_like_svg(head) {
        return Some(ImageFormat::Svg);
    }
    None
}

/// Textual check: after the prolog (BOM, XML declaration, comments, doctype),
/// the first element must be `<svg`
fn looks_like_svg(head: &[u8]) -> bool {
    let head = head.strip_prefix(b"\xef\xbb\xbf").unwrap_or(head);
    let text = String::from_utf8_lossy(head);
    let mut rest = text.trim_start();

    loop {
        let skipped = if rest.starts_with("<?") {
            skip_past(rest, "?>")
        } else if rest.starts_with("<!--") {
            skip_past(rest, "-->")
        } else if rest.starts_with("<!") {
            skip_doctype(rest)
        } else {
            break;
        };
        // Prolog cut off by the sniff window
        let Some(after) = skipped else {
            return false;
        };
        rest = after.trim_start();
    }

    let Some(tag) = rest.get(..4) else {
        return false;
    };
    tag.eq_ignore_ascii_case("<svg")
        && matches!(
            rest[4..].chars().next(),
            None | Some(' ' | '\t' | '\r' | '\n' | '>' | '/')
        )
}

fn skip_past<'t>(text: &'t str, end: &str) -> Option<&'t str> {
    text.find(end).map(|i| &text[i + end.len()..])
}

/// Skip `<!DOCTYPE ...>`, including an internal `[...]` subset
fn skip_doctype(text: &str) -> Option<&str> {
    let close = text.find('>')?;
    match text.find('[') {
        Some(open) if open < close => skip_past(&text[open..], "]").and_then(|t| skip_past(t, ">")),
        _ => Some(&text[close + 1..]),
    }
}
