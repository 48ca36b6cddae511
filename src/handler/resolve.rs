//! Request-to-file resolution
//!
//! Turns a URL path into a path under the served root and a query string into
//! render options.

use crate::config::FilesConfig;
use crate::logger;
use crate::render::RenderOptions;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use url::form_urlencoded;

/// Map a request path to a file path inside `root`
///
/// Returns `None` for empty paths, paths with parent/root components, and paths
/// whose canonical form escapes the root (e.g. through a symlink). The returned
/// path keeps the requested file name so the disposition reports it.
pub fn resolve_file_path(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path).decode_utf8().ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    if relative.as_os_str().is_empty() {
        return None;
    }
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {uri_path}"));
        return None;
    }

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Files root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    let file_path = root.join(relative);
    // Missing files are a plain 404 and are reported later by the responder
    let Ok(file_canonical) = file_path.canonicalize() else {
        return Some(file_path);
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escapes files root: {uri_path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    Some(file_path)
}

/// Build render options from the query string and the host-wide defaults
///
/// `?download` (or `=1`, `true`, `yes`, `on`) forces an attachment, any other
/// value disables it. `?filename=name` overrides the attachment filename;
/// control characters are dropped from it.
pub fn render_options(query: Option<&str>, files: &FilesConfig) -> RenderOptions {
    let mut options = RenderOptions::default().force_download(files.force_download);

    for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if key == files.download_param.as_str() {
            options.force_download = is_truthy(&value);
        } else if key == files.filename_param.as_str() {
            let name: String = value.chars().filter(|c| !c.is_control()).collect();
            if !name.is_empty() {
                options.download_filename = Some(name);
            }
        }
    }

    options
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "" | "1" | "true" | "yes" | "on"
    )
}
