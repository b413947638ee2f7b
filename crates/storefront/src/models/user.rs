//! User domain types.

use bakugai_core::UserId;

/// A storefront user.
///
/// Users are created by seed data only. The password is stored and compared
/// as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email address (unique).
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl User {
    /// Whether `candidate` is exactly this user's password.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}
