use std::path::Path;

use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;

use super::error::StorageError;
use super::key::{new_storage_id, parse_storage_id};
use super::traits::{MediaKind, MediaStore, UploadedMedia};
use crate::config::S3Config;

/// Media store backed by an S3-compatible bucket.
///
/// The storage id doubles as the object key.
pub struct S3MediaStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

impl S3MediaStore {
    pub fn new(
        config: &S3Config,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let region = if config.endpoint.is_empty() {
            config
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Remote(format!("invalid region: {e}")))?
        } else {
            Region::Custom {
                region: config.region.clone(),
                endpoint: config.endpoint.clone(),
            }
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Remote(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Remote(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        local_path: &Path,
        kind: MediaKind,
    ) -> Result<UploadedMedia, StorageError> {
        let data = tokio::fs::read(local_path).await?;
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let storage_id = new_storage_id(kind, local_path);
        let content_type = mime_guess::from_path(local_path)
            .first_or_octet_stream()
            .to_string();

        let response = self
            .bucket
            .put_object_with_content_type(&storage_id, &data, &content_type)
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;
        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Remote(format!(
                "PUT {storage_id} returned HTTP {status}"
            )));
        }

        tracing::debug!(storage_id = %storage_id, size, "Stored media in bucket");

        Ok(UploadedMedia {
            url: format!("{}/{}", self.public_base_url, storage_id),
            storage_id,
            duration: None,
            size,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<bool, StorageError> {
        parse_storage_id(storage_id)?;

        let response = self
            .bucket
            .delete_object(storage_id)
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;
        match response.status_code() {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(StorageError::Remote(format!(
                "DELETE {storage_id} returned HTTP {status}"
            ))),
        }
    }
}
