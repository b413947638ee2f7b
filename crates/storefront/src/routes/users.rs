//! User page: purchase history and total spend.
//!
//! Any visitor may view any user's page.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use bakugai_core::{Price, UserId, lenient_i32};

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, PurchasedProduct, User};
use crate::services::PurchaseService;
use crate::state::AppState;

/// User page template.
#[derive(Template, WebTemplate)]
#[template(path = "mypage.html")]
pub struct MyPageTemplate {
    pub current_user: Option<CurrentUser>,
    pub user: Option<Arc<User>>,
    pub purchases: Vec<PurchasedProduct>,
    pub total_paid: Price,
}

/// Display a user's recent purchases, total spend and profile.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<MyPageTemplate> {
    let user_id = UserId::new(lenient_i32(&user_id));
    let page = PurchaseService::new(state.pool(), state.cache())
        .user_page(user_id)
        .await?;

    Ok(MyPageTemplate {
        current_user,
        user: page.user,
        purchases: page.purchases,
        total_paid: page.total_paid,
    })
}
