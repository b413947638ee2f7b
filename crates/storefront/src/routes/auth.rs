//! Authentication route handlers.
//!
//! Login and logout. The session is a signed cookie, so every handler here
//! returns the updated cookie jar alongside its response.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::services::AuthService;
use crate::state::AppState;

/// Welcome message on a fresh login page.
pub const WELCOME_MESSAGE: &str = "ECサイトで爆買いしよう！！！！";

/// Login form data.
///
/// Missing fields are empty strings, which never match a user.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
///
/// Also rendered for authentication and permission errors, with their
/// message in place of the welcome text.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub message: String,
}

/// Display the login page, ending any current session.
pub async fn login_page(jar: SignedCookieJar) -> impl IntoResponse {
    (
        clear_current_user(jar),
        LoginTemplate {
            message: WELCOME_MESSAGE.to_string(),
        },
    )
}

/// Handle login form submission.
///
/// On failure the session is cleared and the login page is shown with 401.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(SignedCookieJar, Redirect), (SignedCookieJar, AppError)> {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "login succeeded");
            set_sentry_user(&user.id, &user.name);
            Ok((set_current_user(jar, &user), Redirect::to("/")))
        }
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Err((clear_current_user(jar), AppError::from(e)))
        }
    }
}

/// Log out and go back to the login page.
pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    clear_sentry_user();
    (clear_current_user(jar), Redirect::to("/login"))
}
