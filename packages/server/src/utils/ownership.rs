use uuid::Uuid;

use crate::entity::{comment, playlist, tweet, video};
use crate::error::AppError;

/// A record that belongs to exactly one user.
pub trait Owned {
    /// Used in the "Forbidden: Not your ..." message.
    const NOUN: &'static str;

    fn owner_id(&self) -> Uuid;
}

impl Owned for video::Model {
    const NOUN: &'static str = "video";
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Owned for comment::Model {
    const NOUN: &'static str = "comment";
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Owned for tweet::Model {
    const NOUN: &'static str = "tweet";
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Owned for playlist::Model {
    const NOUN: &'static str = "playlist";
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Permit the action only if `actor` owns `resource`.
///
/// The resource must already be loaded; not-found is the caller's concern.
pub fn ensure_owner<T: Owned>(resource: &T, actor: Uuid) -> Result<(), AppError> {
    if resource.owner_id() == actor {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Forbidden: Not your {}", T::NOUN)))
    }
}
