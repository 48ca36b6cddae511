//! Render error types

use std::io;
use std::path::PathBuf;

/// Failure while resolving or rendering a file
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The path does not reference an existing, readable regular file
    #[error("file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file claims an image extension but carries no known image signature
    #[error("unrecognized image format: {}", path.display())]
    UnrecognizedImageFormat { path: PathBuf },

    /// Reading the file body failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A header value could not be built (e.g. control characters in a filename)
    #[error("invalid response header: {0}")]
    InvalidHeader(#[from] hyper::http::Error),
}

impl RenderError {
    /// HTTP status the host should answer with for this error
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::FileNotFound { .. } => 404,
            Self::UnrecognizedImageFormat { .. } => 415,
            Self::Io(_) | Self::InvalidHeader(_) => 500,
        }
    }
}
