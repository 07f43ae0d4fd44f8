//! Uploaded image storage.

use crate::constants::UPLOAD_URL_PREFIX;
use crate::error::AppError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Map a declared content type to an accepted format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Writes uploaded images into a directory served under `/uploads/`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one uploaded image.
    ///
    /// # Arguments
    /// - `mime`: Declared content type of the upload.
    /// - `bytes`: File contents.
    ///
    /// # Returns
    /// The public path of the stored file, e.g. `/uploads/1700000000000-<uuid>.png`.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] for unsupported types or empty files and
    /// [`AppError::Io`] if the file cannot be written.
    pub fn store(&self, mime: &str, bytes: &[u8]) -> Result<String, AppError> {
        let kind = ImageKind::from_mime(mime)
            .ok_or_else(|| AppError::validation("Only JPG, PNG, and WEBP files are allowed."))?;
        if bytes.is_empty() {
            return Err(AppError::validation("File is empty."));
        }

        std::fs::create_dir_all(&self.dir)?;
        let file_name = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            kind.extension()
        );
        std::fs::write(self.dir.join(&file_name), bytes)?;
        tracing::info!("Stored upload {} ({} bytes)", file_name, bytes.len());
        Ok(format!("{}{}", UPLOAD_URL_PREFIX, file_name))
    }

    /// Resolve a `/uploads/...` path to its file on disk.
    ///
    /// Returns `None` for paths outside the upload area.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path.strip_prefix(UPLOAD_URL_PREFIX)?;
        if name.is_empty() || name.split(['/', '\\']).any(|segment| segment == "..") {
            return None;
        }
        Some(self.dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageKind, UploadStore};
    use crate::error::AppError;
    use tempfile::TempDir;

    #[test]
    fn mime_mapping_accepts_only_three_formats() {
        assert_eq!(ImageKind::from_mime("image/png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("IMAGE/JPEG"), Some(ImageKind::Jpeg));
        assert_eq!(
            ImageKind::from_mime("image/webp; charset=binary"),
            Some(ImageKind::Webp)
        );
        assert_eq!(ImageKind::from_mime("image/gif"), None);
        assert_eq!(ImageKind::from_mime("text/plain"), None);
    }

    #[test]
    fn store_writes_timestamped_file_and_creates_dir() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path().join("nested").join("uploads"));
        let path = store.store("image/png", b"\x89PNG fake").expect("store");

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".png"));
        let name = path.trim_start_matches("/uploads/");
        let (millis, _) = name.split_once('-').expect("millis prefix");
        assert!(millis.parse::<i64>().is_ok());

        let on_disk = store.resolve(&path).expect("resolve");
        assert_eq!(std::fs::read(on_disk).expect("read"), b"\x89PNG fake");
    }

    #[test]
    fn store_rejects_bad_type_and_empty_body() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path());
        match store.store("image/gif", b"GIF89a") {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Only JPG, PNG, and WEBP files are allowed.")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(matches!(
            store.store("image/jpeg", b""),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn resolve_refuses_traversal() {
        let store = UploadStore::new("/srv/uploads");
        assert!(store.resolve("/uploads/../etc/passwd").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("/uploads/").is_none());
        assert!(store.resolve("/uploads/a.png").is_some());
    }
}
