//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Product listing (?page=N)
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//!
//! # Auth
//! GET  /login                      - Login page (ends the session)
//! POST /login                      - Login action
//! GET  /logout                     - Logout
//!
//! # Store
//! GET  /users/{user_id}            - Purchase history and total spend
//! GET  /products/{product_id}      - Product detail
//! POST /products/buy/{product_id}  - Buy (requires login)
//! POST /comments/{product_id}      - Comment (requires login)
//!
//! # Benchmark
//! GET  /initialize                 - Reset to the seed state
//! ```
//!
//! Anything else is served from the public directory.

pub mod auth;
pub mod comments;
pub mod home;
pub mod initialize;
pub mod products;
pub mod users;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/users/{user_id}", get(users::show))
        .route("/products/{product_id}", get(products::show))
        .route("/products/buy/{product_id}", post(products::buy))
        .route("/comments/{product_id}", post(comments::create))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/initialize", get(initialize::initialize))
        .merge(auth_routes())
        .merge(store_routes())
}

/// Build the full application with static files and the tracing stack.
///
/// Sentry layers are added by the binary, outside of this router.
pub fn app(state: AppState) -> Router {
    let public_dir = ServeDir::new(&state.config().public_dir);

    routes()
        .fallback_service(public_dir)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                user_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
        response::Response,
    };
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{DatabaseConfig, StorefrontConfig};
    use crate::db::create_lazy_pool;
    use crate::error::LOGIN_REQUIRED_MESSAGE;
    use crate::middleware::{SESSION_COOKIE_NAME, request_id::REQUEST_ID_HEADER};

    fn test_app() -> Router {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            public_dir: PathBuf::from("public"),
            session_secret: SecretString::from("router test secret"),
            database: DatabaseConfig {
                host: "127.0.0.1".to_string(),
                port: 1,
                username: "nobody".to_string(),
                password: SecretString::from("nothing"),
                name: "nothing".to_string(),
                max_connections: 1,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = create_lazy_pool(&config.database);
        app(AppState::new(config, pool).unwrap())
    }

    async fn send(request: Request<Body>) -> Response {
        test_app().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_login_page_shows_welcome() {
        let response = send(Request::get("/login").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(auth::WELCOME_MESSAGE));
    }

    #[tokio::test]
    async fn test_logout_redirects_to_login() {
        let response = send(Request::get("/logout").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_buy_without_session_is_forbidden() {
        let response = send(
            Request::post("/products/buy/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains(LOGIN_REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_comment_without_session_is_forbidden() {
        let response = send(
            Request::post("/comments/1")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("content=hello"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains(LOGIN_REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_forged_session_is_ignored() {
        let response = send(
            Request::post("/products/buy/1")
                .header(header::COOKIE, format!("{SESSION_COOKIE_NAME}=eyJpZCI6MSwibmFtZSI6ImEifQ"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = send(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "bench-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "bench-42");
    }

    #[tokio::test]
    async fn test_malformed_request_id_is_replaced() {
        let response = send(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "not a token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let echoed = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_ne!(echoed, "not a token");
        assert!(uuid::Uuid::parse_str(echoed.to_str().unwrap()).is_ok());
    }
}
