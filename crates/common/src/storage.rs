//! Media storage abstraction for uploaded post images.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::{AppError, AppResult};

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write a new file under `key`.
    ///
    /// Returns `false` without touching anything when `key` is already taken.
    async fn create(&self, key: &str, data: &[u8]) -> AppResult<bool>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn create(&self, key: &str, data: &[u8]) -> AppResult<bool> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(AppError::Storage(format!("Failed to create file: {e}"))),
        };

        file.write_all(data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        tracing::debug!(key = %key, size = data.len(), "Stored media file");

        Ok(true)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Reduce an uploaded file name to a safe single path component.
///
/// Directory parts are dropped and anything other than ASCII alphanumerics,
/// `.`, `-` and `_` becomes `_`. An empty result falls back to `upload`.
#[must_use]
pub fn sanitize_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_file_name("small.jpeg"), "small.jpeg");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\cat.png"), "cat.png");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my photo!.gif"), "my_photo_.gif");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[tokio::test]
    async fn test_local_storage_never_overwrites() {
        let dir = std::env::temp_dir().join(format!("yatube-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.clone(), "/media/".to_string());

        assert!(storage.create("posts/a.gif", b"GIF89a").await.unwrap());
        assert!(!storage.create("posts/a.gif", b"other").await.unwrap());

        let on_disk = std::fs::read(dir.join("posts").join("a.gif")).unwrap();
        assert_eq!(on_disk, b"GIF89a");
        assert_eq!(storage.public_url("posts/a.gif"), "/media/posts/a.gif");

        let _ = std::fs::remove_dir_all(dir);
    }
}
