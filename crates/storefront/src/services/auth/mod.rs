//! Authentication service.
//!
//! Email + plain-text password login against the `users` table.

mod error;

pub use error::AuthError;

use sqlx::PgPool;

use crate::db::UserRepository;
use crate::models::CurrentUser;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Authenticate with an exact email and password match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no user has that email or the
    /// password differs. Returns `AuthError::Repository` if the lookup fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password_matches(password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(CurrentUser::from(&user))
    }
}
