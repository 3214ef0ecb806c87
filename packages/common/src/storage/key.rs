use std::path::Path;

use uuid::Uuid;

use super::error::StorageError;
use super::traits::MediaKind;

/// Build a fresh storage id: `{kind}/{uuid-v7}[.ext]`.
///
/// The extension is taken from `local_path` and lowercased; anything that is
/// not plain ASCII alphanumeric is dropped.
pub fn new_storage_id(kind: MediaKind, local_path: &Path) -> String {
    let ext = local_path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase());

    match ext {
        Some(ext) => format!("{}/{}.{}", kind.as_str(), Uuid::now_v7(), ext),
        None => format!("{}/{}", kind.as_str(), Uuid::now_v7()),
    }
}

/// Split and check a storage id produced by [`new_storage_id`].
pub fn parse_storage_id(storage_id: &str) -> Result<(MediaKind, &str), StorageError> {
    let (kind, name) = storage_id
        .split_once('/')
        .ok_or_else(|| StorageError::InvalidId(storage_id.to_string()))?;
    let kind = MediaKind::parse(kind).ok_or_else(|| StorageError::InvalidId(storage_id.to_string()))?;

    if name.is_empty()
        || name.starts_with('.')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(StorageError::InvalidId(storage_id.to_string()));
    }
    Ok((kind, name))
}
