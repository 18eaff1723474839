//! Image ingestion: turns a user-selected file into a displayable preview
//! copy and a base64 payload ready for transport.

pub mod mime;

use crate::{Error, Result};
use base64::Engine as _;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Extensions the photo picker accepts.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Whether the file declares an image content type the picker accepts.
pub fn declares_image_type(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Displayable reference to an ingested photo, backed by a copy in the
/// session preview directory. Previews live for the session lifetime unless
/// released, so the owning slot must call [`PreviewHandle::release`] when it
/// is replaced or deleted.
#[derive(Debug)]
pub struct PreviewHandle {
    path: PathBuf,
}

impl PreviewHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the backing preview file. Failure to remove it is logged and
    /// otherwise ignored; the session preview directory is reclaimed wholesale
    /// on teardown.
    pub fn release(self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to release preview {}: {}", self.path.display(), e);
        }
    }
}

/// A fully ingested photo. Preview handle, encoded payload and media type are
/// created together, so a filled slot always has all three.
#[derive(Debug)]
pub struct IngestedImage {
    pub preview: PreviewHandle,
    pub payload: String,
    pub media_type: String,
}

/// Read a photo and produce its preview copy plus transport payload.
///
/// The operation is atomic: it either returns a complete [`IngestedImage`] or
/// an error with nothing left behind for the caller to clean up.
pub async fn ingest_file(preview_dir: &Path, path: &Path) -> Result<IngestedImage> {
    if !declares_image_type(path) {
        return Err(Error::Ingestion(format!(
            "Not an image file: {}",
            path.display()
        )));
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        Error::Ingestion(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let media_type = mime::detect_image_mime(&bytes).to_string();
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("img")
        .to_ascii_lowercase();
    let preview_path = preview_dir.join(format!("{}.{}", Uuid::new_v4(), extension));

    tokio::fs::write(&preview_path, &bytes).await.map_err(|e| {
        Error::Ingestion(format!(
            "Failed to write preview {}: {}",
            preview_path.display(),
            e
        ))
    })?;

    tracing::debug!(
        "Ingested {} ({} bytes, {}) -> preview {}",
        path.display(),
        bytes.len(),
        media_type,
        preview_path.display()
    );

    Ok(IngestedImage {
        preview: PreviewHandle { path: preview_path },
        payload,
        media_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_declares_image_type() {
        assert!(declares_image_type(Path::new("photo.png")));
        assert!(declares_image_type(Path::new("photo.JPG")));
        assert!(declares_image_type(Path::new("photo.jpeg")));
        assert!(declares_image_type(Path::new("photo.webp")));
        assert!(!declares_image_type(Path::new("notes.txt")));
        assert!(!declares_image_type(Path::new("photo")));
    }

    #[tokio::test]
    async fn test_ingest_creates_preview_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        tokio::fs::write(&source, PNG_HEADER).await.unwrap();

        let ingested = ingest_file(dir.path(), &source).await.unwrap();

        assert_eq!(ingested.media_type, "image/png");
        assert!(!ingested.payload.is_empty());
        assert!(ingested.preview.path().exists());

        let preview_bytes = std::fs::read(ingested.preview.path()).unwrap();
        assert_eq!(preview_bytes, PNG_HEADER);
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_image_extension() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        tokio::fs::write(&source, b"hello").await.unwrap();

        let err = ingest_file(dir.path(), &source).await.unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
    }

    #[tokio::test]
    async fn test_ingest_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ingest_file(dir.path(), &dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
    }

    #[tokio::test]
    async fn test_release_removes_preview_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        tokio::fs::write(&source, [0xFF, 0xD8, 0xFF, 0xE0]).await.unwrap();

        let ingested = ingest_file(dir.path(), &source).await.unwrap();
        let preview_path = ingested.preview.path().to_path_buf();
        assert!(preview_path.exists());

        ingested.preview.release();
        assert!(!preview_path.exists());
    }

    #[tokio::test]
    async fn test_undetectable_header_defaults_to_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("odd.png");
        tokio::fs::write(&source, [0x00, 0x01, 0x02, 0x03]).await.unwrap();

        let ingested = ingest_file(dir.path(), &source).await.unwrap();
        assert_eq!(ingested.media_type, "application/octet-stream");
    }
}
