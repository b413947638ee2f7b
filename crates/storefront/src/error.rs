//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! The two authentication failures render the login page with a localized
//! message instead of a bare status text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::routes::auth::LoginTemplate;
use crate::services::AuthError;

/// Shown when a login attempt fails.
pub const LOGIN_FAILED_MESSAGE: &str = "ログインに失敗しました";

/// Shown when a protected action is attempted without logging in.
pub const LOGIN_REQUIRED_MESSAGE: &str = "先にログインをしてください";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad email or password.
    #[error("authentication failed")]
    Authentication,

    /// A protected action was attempted without a session.
    #[error("permission denied")]
    PermissionDenied,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Authentication,
            AuthError::Repository(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Authentication => login_page(StatusCode::UNAUTHORIZED, LOGIN_FAILED_MESSAGE),
            Self::PermissionDenied => login_page(StatusCode::FORBIDDEN, LOGIN_REQUIRED_MESSAGE),
            Self::Database(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );

                // Don't expose internal error details to clients
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

fn login_page(status: StatusCode, message: &str) -> Response {
    (
        status,
        LoginTemplate {
            message: message.to_string(),
        },
    )
        .into_response()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(name.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        String::from_utf8(bytes.to_vec()).expect("body was not utf-8")
    }

    #[test]
    fn test_app_error_display() {
        let err =
            AppError::Database(RepositoryError::DataCorruption("pool closed".to_string()));
        assert_eq!(err.to_string(), "Database error: data corruption: pool closed");
        assert_eq!(AppError::PermissionDenied.to_string(), "permission denied");
    }

    #[test]
    fn test_auth_error_conversion() {
        assert!(matches!(
            AppError::from(AuthError::InvalidCredentials),
            AppError::Authentication
        ));
        assert!(matches!(
            AppError::from(AuthError::Repository(RepositoryError::DataCorruption(
                "x".to_string()
            ))),
            AppError::Database(_)
        ));
    }

    #[tokio::test]
    async fn test_authentication_renders_login_with_401() {
        let response = AppError::Authentication.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains(LOGIN_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_permission_denied_renders_login_with_403() {
        let response = AppError::PermissionDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains(LOGIN_REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response =
            AppError::Database(RepositoryError::DataCorruption("secret detail".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(!body.contains("secret detail"));
    }
}
