//! File responder
//!
//! Classifies a file by extension and turns it into a complete response: inline
//! for catalogued types, attachment download for everything else.

use super::catalog::{ContentCategory, ExtensionCatalog};
use super::error::RenderError;
use super::sniff::{detect_image_format, SNIFF_LEN};
use super::target::FileTarget;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Content-Type sent for attachment downloads
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Whether a response carries the file bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Full,
    HeadersOnly,
}

/// Per-request overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Always send as attachment, whatever the extension
    pub force_download: bool,
    /// Filename reported in the attachment disposition instead of the basename
    pub download_filename: Option<String>,
}

impl RenderOptions {
    #[must_use]
    pub fn force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    #[must_use]
    pub fn download_filename(mut self, name: impl Into<String>) -> Self {
        self.download_filename = Some(name.into());
        self
    }
}

/// Serves one file for one request
#[derive(Debug)]
pub struct FileResponder<'a> {
    target: FileTarget,
    options: RenderOptions,
    catalog: &'a ExtensionCatalog,
}

impl FileResponder<'static> {
    /// Open `path` against the standard catalog
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        Self::with_catalog(path, ExtensionCatalog::standard()).await
    }
}

impl<'a> FileResponder<'a> {
    /// Open `path` against an injected catalog
    pub async fn with_catalog(
        path: impl AsRef<Path>,
        catalog: &'a ExtensionCatalog,
    ) -> Result<Self, RenderError> {
        let target = FileTarget::resolve(path).await?;
        Ok(Self {
            target,
            options: RenderOptions::default(),
            catalog,
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// First catalog category covering the file's extension
    pub fn classify(&self) -> Option<&'a ContentCategory> {
        self.target
            .extension()
            .and_then(|ext| self.catalog.classify(ext))
    }

    /// Render inline when the extension is catalogued, otherwise download
    ///
    /// The MIME type is resolved before the response is assembled, so an
    /// unrecognised image never produces a partial set of headers.
    pub async fn render(&self) -> Result<Response<Full<Bytes>>, RenderError> {
        self.respond(BodyMode::Full).await
    }

    /// Same headers as [`render`](Self::render) with an empty body
    ///
    /// Only the signature prefix of an image is read; other files are never read.
    pub async fn render_headers(&self) -> Result<Response<Full<Bytes>>, RenderError> {
        self.respond(BodyMode::HeadersOnly).await
    }

    /// Send the file as a binary attachment
    pub async fn download(&self) -> Result<Response<Full<Bytes>>, RenderError> {
        self.attachment(BodyMode::Full).await
    }

    /// Resolve the Content-Type for a category
    ///
    /// Images are identified from `head`, the leading bytes of the file. Every
    /// other category label is used as the MIME type as-is.
    pub fn resolve_mime_type<'c>(
        &self,
        category: &'c ContentCategory,
        head: &[u8],
    ) -> Result<&'c str, RenderError> {
        match category {
            ContentCategory::Image => detect_image_format(head)
                .map(|format| format.mime_type())
                .ok_or_else(|| RenderError::UnrecognizedImageFormat {
                    path: self.target.path().to_path_buf(),
                }),
            ContentCategory::Mime(mime) => Ok(mime.as_str()),
        }
    }

    async fn respond(&self, mode: BodyMode) -> Result<Response<Full<Bytes>>, RenderError> {
        if self.options.force_download {
            return self.attachment(mode).await;
        }
        let Some(category) = self.classify() else {
            return self.attachment(mode).await;
        };

        let (mut file, size) = self.open_file().await?;
        let mut data = Vec::new();
        if *category == ContentCategory::Image {
            (&mut file)
                .take(SNIFF_LEN as u64)
                .read_to_end(&mut data)
                .await?;
        }
        let content_type = self.resolve_mime_type(category, &data)?;
        let body = self.finish_body(file, data, size, mode).await?;

        let disposition = format!("inline; filename=\"{}\"", quote(self.target.basename()));
        let response = Response::builder()
            .status(200)
            .header("Content-Length", size)
            .header("Content-Disposition", disposition.as_bytes())
            .header("Content-Type", content_type)
            .body(Full::new(body))?;
        Ok(response)
    }

    async fn attachment(&self, mode: BodyMode) -> Result<Response<Full<Bytes>>, RenderError> {
        let filename = self
            .options
            .download_filename
            .as_deref()
            .unwrap_or_else(|| self.target.basename());

        let (file, size) = self.open_file().await?;
        let body = self.finish_body(file, Vec::new(), size, mode).await?;

        let disposition = format!("attachment; filename=\"{}\"", quote(filename));
        let response = Response::builder()
            .status(200)
            .header("Content-Length", size)
            .header("Content-Type", OCTET_STREAM)
            .header("Content-Transfer-Encoding", "Binary")
            .header("Content-Disposition", disposition.as_bytes())
            .body(Full::new(body))?;
        Ok(response)
    }

    /// Open the file and take its current size
    async fn open_file(&self) -> Result<(fs::File, u64), RenderError> {
        let file = fs::File::open(self.target.path()).await?;
        let size = file.metadata().await?.len();
        Ok((file, size))
    }

    /// Read the rest of `file` after the `data` already taken from it,
    /// checking the total against the size at open time
    async fn finish_body(
        &self,
        mut file: fs::File,
        mut data: Vec<u8>,
        size: u64,
        mode: BodyMode,
    ) -> Result<Bytes, RenderError> {
        if mode == BodyMode::HeadersOnly {
            return Ok(Bytes::new());
        }

        data.reserve(usize::try_from(size).unwrap_or_default().saturating_sub(data.len()));
        file.read_to_end(&mut data).await?;

        if u64::try_from(data.len()).ok() != Some(size) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "file size changed while reading '{}'",
                    self.target.path().display()
                ),
            )
            .into());
        }
        Ok(Bytes::from(data))
    }
}

/// Escape a filename for use inside a quoted-string
fn quote(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
