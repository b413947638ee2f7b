//! Session-related types.
//!
//! Types carried in the signed session cookie.

use serde::{Deserialize, Serialize};

use bakugai_core::UserId;

use super::User;

/// Session-stored user identity.
///
/// The whole session is this pair; there is no server-side session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}
