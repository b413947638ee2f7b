//! Comment route handlers.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use bakugai_core::{ProductId, lenient_i32};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::CommentService;
use crate::state::AppState;

/// Comment form data. A missing `content` field is an empty comment.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}

/// Post a comment on a product, then show the author's page.
#[instrument(skip_all, fields(product_id = %product_id, user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CommentForm>,
) -> Result<Redirect> {
    let product_id = ProductId::new(lenient_i32(&product_id));
    let comment_id = CommentService::new(state.pool())
        .post(product_id, &user, &form.content)
        .await?;

    tracing::info!(%comment_id, "comment posted");
    Ok(Redirect::to(&format!("/users/{}", user.id)))
}
