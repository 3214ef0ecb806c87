use serde::Serialize;
use uuid::Uuid;

use crate::entity::user;

/// Public view of a user, embedded wherever an owner or channel is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Alice Liddell")]
    pub full_name: String,
    pub avatar_url: Option<String>,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            full_name: m.full_name,
            avatar_url: m.avatar_url,
        }
    }
}
