use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Category of an uploaded media file. Determines the key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "video" => Some(MediaKind::Video),
            "image" => Some(MediaKind::Image),
            _ => None,
        }
    }

    /// Whether a MIME type (as guessed from a filename) belongs to this kind.
    pub fn accepts(self, mime: &mime_guess::Mime) -> bool {
        match self {
            MediaKind::Video => mime.type_() == mime_guess::mime::VIDEO,
            MediaKind::Image => mime.type_() == mime_guess::mime::IMAGE,
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    /// Publicly reachable URL of the stored object.
    pub url: String,
    /// Opaque identifier to pass back to [`MediaStore::delete`].
    pub storage_id: String,
    /// Playback duration in seconds, when the backend can derive it.
    pub duration: Option<f64>,
    pub size: u64,
}

/// Remote media storage. Both calls are treated as atomic and are never
/// retried by callers.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the file at `local_path` and return where it ended up.
    async fn upload(&self, local_path: &Path, kind: MediaKind)
    -> Result<UploadedMedia, StorageError>;

    /// Delete an object by its storage id.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, storage_id: &str) -> Result<bool, StorageError>;
}
