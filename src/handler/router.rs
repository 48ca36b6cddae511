//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, file resolution,
//! rendering and access logging.

use crate::config::AppState;
use crate::handler::resolve::{render_options, resolve_file_path};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::render::{FileResponder, RenderError};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Uri};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = respond(&method, &uri, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = http_version(req.version()).to_string();
        entry.user_agent = user_agent;
        fill_from_response(&mut entry, &response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Produce the response for a method and URI
pub async fn respond(method: &Method, uri: &Uri, state: &AppState) -> Response<Full<Bytes>> {
    match *method {
        Method::GET => serve_file(uri, state, false).await,
        Method::HEAD => serve_file(uri, state, true).await,
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    }
}

/// Render the file the URI points at, or the matching error response
///
/// With `headers_only` the body is left empty and the file is not read.
async fn serve_file(uri: &Uri, state: &AppState, headers_only: bool) -> Response<Full<Bytes>> {
    let files = &state.config.files;
    let Some(path) = resolve_file_path(Path::new(&files.root), uri.path()) else {
        return http::build_404_response();
    };
    let options = render_options(uri.query(), files);

    let rendered = match FileResponder::with_catalog(&path, state.catalog).await {
        Ok(responder) => {
            let responder = responder.with_options(options);
            if headers_only {
                responder.render_headers().await
            } else {
                responder.render().await
            }
        }
        Err(e) => Err(e),
    };

    rendered.unwrap_or_else(|err| {
        match &err {
            // Missing files are routine 404s
            RenderError::FileNotFound { .. } => {}
            RenderError::UnrecognizedImageFormat { .. } => logger::log_warning(&err.to_string()),
            RenderError::Io(_) | RenderError::InvalidHeader(_) => {
                logger::log_error(&format!("Failed to render '{}': {err}", path.display()));
            }
        }
        http::build_error_response(&err)
    })
}

fn fill_from_response(entry: &mut AccessLogEntry, response: &Response<Full<Bytes>>) {
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    entry.status = response.status().as_u16();
    entry.body_bytes = header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    entry.content_type = header("content-type");
    entry.disposition = header("content-disposition")
        .and_then(|v| v.split(';').next().map(|kind| kind.trim().to_string()));
}

const fn http_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    fn state_for(dir: &TempDir) -> AppState {
        let mut config = Config::load_from(dir.path().join("no-config").to_str().unwrap()).unwrap();
        config.files.root = dir.path().to_str().unwrap().to_string();
        AppState::new(&config)
    }

    async fn get(state: &AppState, uri: &str) -> Response<Full<Bytes>> {
        respond(&Method::GET, &uri.parse().unwrap(), state).await
    }

    fn header<'r>(resp: &'r Response<Full<Bytes>>, name: &str) -> Option<&'r str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_inline_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.jpg"), PNG).unwrap();
        let state = state_for(&dir);

        let resp = get(&state, "/logo.jpg").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "Content-Type"), Some("image/png"));
        assert_eq!(
            header(&resp, "Content-Disposition"),
            Some("inline; filename=\"logo.jpg\"")
        );
    }

    #[tokio::test]
    async fn test_download_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        let state = state_for(&dir);

        let resp = get(&state, "/notes.txt?download=1&filename=report.bin").await;
        assert_eq!(header(&resp, "Content-Type"), Some("application/octet-stream"));
        assert_eq!(
            header(&resp, "Content-Disposition"),
            Some("attachment; filename=\"report.bin\"")
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_config_force_download() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.html"), b"<p>hi</p>").unwrap();
        let mut state = state_for(&dir);
        state.config.files.force_download = true;

        let resp = get(&state, "/page.html").await;
        assert_eq!(header(&resp, "Content-Type"), Some("application/octet-stream"));

        let resp = get(&state, "/page.html?download=0").await;
        assert_eq!(header(&resp, "Content-Type"), Some("text/html"));
    }

    #[tokio::test]
    async fn test_head_keeps_length() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.css"), b"body{}").unwrap();
        let state = state_for(&dir);

        let resp = respond(&Method::HEAD, &"/a.css".parse().unwrap(), &state).await;
        assert_eq!(header(&resp, "Content-Length"), Some("6"));
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_head_matches_get_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), PNG).unwrap();
        std::fs::write(dir.path().join("fake.png"), b"text").unwrap();
        let state = state_for(&dir);

        let uri: Uri = "/logo.png?download=1".parse().unwrap();
        let get_resp = respond(&Method::GET, &uri, &state).await;
        let head_resp = respond(&Method::HEAD, &uri, &state).await;
        assert_eq!(get_resp.headers(), head_resp.headers());

        let head = respond(&Method::HEAD, &"/fake.png".parse().unwrap(), &state).await;
        assert_eq!(head.status(), 415);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fake.png"), b"text").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let state = state_for(&dir);

        assert_eq!(get(&state, "/missing.txt").await.status(), 404);
        assert_eq!(get(&state, "/sub").await.status(), 404);
        assert_eq!(get(&state, "/../etc/passwd").await.status(), 404);
        assert_eq!(get(&state, "/fake.png").await.status(), 415);
    }

    #[tokio::test]
    async fn test_methods() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);
        let uri: Uri = "/a.txt".parse().unwrap();

        assert_eq!(respond(&Method::POST, &uri, &state).await.status(), 405);
        assert_eq!(respond(&Method::OPTIONS, &uri, &state).await.status(), 204);
    }

    #[test]
    fn test_fill_from_response() {
        let resp = Response::builder()
            .status(200)
            .header("Content-Length", 42)
            .header("Content-Type", "video/mp4")
            .header("Content-Disposition", "inline; filename=\"a.mp4\"")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let mut entry = AccessLogEntry::new("::1".into(), "GET".into(), "/a.mp4".into());
        fill_from_response(&mut entry, &resp);

        assert_eq!(entry.body_bytes, 42);
        assert_eq!(entry.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(entry.disposition.as_deref(), Some("inline"));
    }
}
