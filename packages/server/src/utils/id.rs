use uuid::Uuid;

use crate::error::AppError;

/// Parse an entity reference taken from a path or query string.
///
/// Only the syntax is checked, so this never touches storage. `noun` names
/// the entity in the error message ("Invalid video ID").
pub fn parse_id(raw: &str, noun: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {noun} ID")))
}
