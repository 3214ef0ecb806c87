use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::key::{new_storage_id, parse_storage_id};
use super::traits::{MediaKind, MediaStore, UploadedMedia};

/// Filesystem-backed media store.
///
/// Objects live at `{base_path}/{kind}/{uuid}.{ext}`; the storage id is the
/// path relative to `base_path`, and the public URL is that id appended to
/// `public_base_url`.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        for kind in [MediaKind::Video, MediaKind::Image] {
            fs::create_dir_all(base_path.join(kind.as_str())).await?;
        }
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn object_path(&self, storage_id: &str) -> Result<PathBuf, StorageError> {
        let (kind, name) = parse_storage_id(storage_id)?;
        Ok(self.base_path.join(kind.as_str()).join(name))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(
        &self,
        local_path: &Path,
        kind: MediaKind,
    ) -> Result<UploadedMedia, StorageError> {
        let size = fs::metadata(local_path).await?.len();
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let storage_id = new_storage_id(kind, local_path);
        let object_path = self.object_path(&storage_id)?;

        // Copy into the store's own temp dir first so the final rename never
        // crosses filesystems.
        let temp_path = self.temp_path();
        if let Err(e) = fs::copy(local_path, &temp_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(storage_id = %storage_id, size, "Stored media on filesystem");

        Ok(UploadedMedia {
            url: format!("{}/{}", self.public_base_url, storage_id),
            storage_id,
            duration: None,
            size,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(storage_id)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
