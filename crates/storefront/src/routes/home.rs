//! Home page: the product listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, ListedProduct};
use crate::services::{CatalogService, ListingPage};
use crate::state::AppState;

/// Listing query parameters.
///
/// `page` stays a string so that any value is accepted and read leniently.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<CurrentUser>,
    pub page: i32,
    pub products: Vec<ListedProduct>,
}

/// Display one page of products with their latest comments.
#[instrument(skip_all, fields(page = ?query.page))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<ListingQuery>,
) -> Result<IndexTemplate> {
    let page = ListingPage::from_param(query.page.as_deref());
    let products = CatalogService::new(state.pool(), state.cache())
        .listing(page)
        .await?;

    Ok(IndexTemplate {
        current_user,
        page: page.number(),
        products,
    })
}
