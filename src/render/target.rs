//! File target resolution

use super::error::RenderError;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A file validated to exist and be readable
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
    basename: String,
    extension: Option<String>,
}

impl FileTarget {
    /// Resolve `path`, failing with `FileNotFound` unless it is a readable regular file
    pub async fn resolve(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref().to_path_buf();

        let not_found = |source: io::Error| RenderError::FileNotFound {
            path: path.clone(),
            source,
        };

        // Opening proves readability; the handle is dropped right away
        let file = fs::File::open(&path).await.map_err(not_found)?;
        let metadata = file.metadata().await.map_err(not_found)?;
        if !metadata.is_file() {
            return Err(not_found(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Text after the last dot of the basename, so `.png` has extension `png`
        let extension = basename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty());

        Ok(Self {
            path,
            basename,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, e.g. `photo.JPG`
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Lowercase extension without the dot, `None` if the name has none
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Photo.JPG");
        std::fs::write(&path, b"data").unwrap();

        let target = FileTarget::resolve(&path).await.unwrap();
        assert_eq!(target.basename(), "Photo.JPG");
        assert_eq!(target.extension(), Some("jpg"));
        assert_eq!(target.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_resolve_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, b"data").unwrap();

        let target = FileTarget::resolve(&path).await.unwrap();
        assert_eq!(target.basename(), "README");
        assert_eq!(target.extension(), None);
    }

    #[tokio::test]
    async fn test_resolve_dotfile_extension() {
        let dir = tempfile::tempdir().unwrap();
        let dotfile = dir.path().join(".PNG");
        std::fs::write(&dotfile, b"data").unwrap();
        let trailing = dir.path().join("notes.");
        std::fs::write(&trailing, b"data").unwrap();
        let double = dir.path().join("backup.tar.GZ");
        std::fs::write(&double, b"data").unwrap();

        let target = FileTarget::resolve(&dotfile).await.unwrap();
        assert_eq!(target.basename(), ".PNG");
        assert_eq!(target.extension(), Some("png"));
        assert_eq!(FileTarget::resolve(&trailing).await.unwrap().extension(), None);
        assert_eq!(FileTarget::resolve(&double).await.unwrap().extension(), Some("gz"));
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileTarget::resolve(dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileTarget::resolve(dir.path()).await.unwrap_err();
        assert!(matches!(err, RenderError::FileNotFound { .. }));
    }
}
