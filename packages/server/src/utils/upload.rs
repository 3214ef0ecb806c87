use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use common::storage::{MediaKind, MediaStore, UploadedMedia};
use mime_guess::Mime;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, ErrorDetail};

/// A multipart file spooled to local disk. The file is removed on drop.
#[derive(Debug)]
pub struct SpooledFile {
    path: PathBuf,
    pub file_name: String,
    pub mime: Mime,
    pub size: u64,
}

impl SpooledFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Problem to report if this file is not of `kind`.
    pub fn check_kind(&self, field: &str, kind: MediaKind) -> Option<ErrorDetail> {
        if kind.accepts(&self.mime) {
            None
        } else {
            Some(ErrorDetail::field(
                field,
                format!("Expected a {} file, got {}", kind.as_str(), self.mime),
            ))
        }
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        // Best effort.
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Text fields and spooled files of a multipart form, keyed by field name.
#[derive(Debug, Default)]
pub struct MediaForm {
    pub text: HashMap<String, String>,
    pub files: HashMap<String, SpooledFile>,
}

impl MediaForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }
}

/// Drain a multipart request, spooling file parts to temp files.
///
/// Later parts with the same name replace earlier ones. File parts with an
/// empty filename and no content are what browsers send for an untouched file
/// input; they are skipped.
pub async fn read_form(multipart: &mut Multipart, max_size: u64) -> Result<MediaForm, AppError> {
    let mut form = MediaForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let spooled = spool_field(field, max_size).await?;
            if spooled.file_name.is_empty() && spooled.size == 0 {
                continue;
            }
            form.files.insert(name, spooled);
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
            form.text.insert(name, text);
        }
    }

    Ok(form)
}

/// Stream a multipart field to a temp file.
async fn spool_field(mut field: Field<'_>, max_size: u64) -> Result<SpooledFile, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let mime = field
        .content_type()
        .and_then(|ct| ct.parse::<Mime>().ok())
        .filter(|m| m.essence_str() != "application/octet-stream")
        .unwrap_or_else(|| mime_guess::from_path(&file_name).first_or_octet_stream());

    let mut temp_name = format!("tubehub-upload-{}", Uuid::new_v4());
    if let Some(ext) = Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        temp_name.push('.');
        temp_name.push_str(ext);
    }

    // Owning the path from here on guarantees cleanup on every exit.
    let mut spooled = SpooledFile {
        path: std::env::temp_dir().join(temp_name),
        file_name,
        mime,
        size: 0,
    };

    let mut temp_file = tokio::fs::File::create(&spooled.path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        spooled.size += chunk.len() as u64;
        if spooled.size > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

    Ok(spooled)
}

/// Hand a spooled file to the media store.
pub async fn store(
    media: &dyn MediaStore,
    file: &SpooledFile,
    kind: MediaKind,
) -> Result<UploadedMedia, AppError> {
    let uploaded = media.upload(file.path(), kind).await?;
    tracing::info!(
        storage_id = %uploaded.storage_id,
        size = uploaded.size,
        "Uploaded {}",
        kind.as_str()
    );
    Ok(uploaded)
}

/// Delete a stored object after the database no longer references it.
///
/// Failures are logged, not returned: the record already points elsewhere,
/// so the only casualty is an orphaned object.
pub async fn discard(media: &dyn MediaStore, storage_id: &str) {
    match media.delete(storage_id).await {
        Ok(true) => tracing::info!(storage_id, "Deleted media"),
        Ok(false) => tracing::warn!(storage_id, "Media already gone"),
        Err(e) => tracing::warn!(storage_id, "Failed to delete media: {}", e),
    }
}
