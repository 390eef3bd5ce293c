use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as exposed by the API. Credential fields (password hash,
/// pending confirmation code) never leave the database layer.
#[derive(Serialize, Deserialize, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub confirmed: bool,
    pub created: DateTime<Utc>,
}

use crate::database::models::user_item::User as DBUser;
impl From<DBUser> for User {
    fn from(data: DBUser) -> Self {
        Self {
            id: data.id.into(),
            email: data.email,
            confirmed: data.confirmed,
            created: data.created,
        }
    }
}
