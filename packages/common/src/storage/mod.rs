mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use key::{new_storage_id, parse_storage_id};
pub use traits::{MediaKind, MediaStore, UploadedMedia};
