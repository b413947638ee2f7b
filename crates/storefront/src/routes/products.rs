//! Product route handlers.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use bakugai_core::{ProductId, lenient_i32};

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{CurrentUser, Product};
use crate::services::{CatalogService, PurchaseService};
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub current_user: Option<CurrentUser>,
    pub product: Option<Arc<Product>>,
    pub already_bought: bool,
}

/// Display product detail page.
///
/// An unknown id renders the page without a product.
#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(product_id): Path<String>,
) -> Result<ProductTemplate> {
    let product_id = ProductId::new(lenient_i32(&product_id));
    let product = CatalogService::new(state.pool(), state.cache())
        .product(product_id)
        .await?;

    let already_bought = match &product {
        Some(_) => {
            PurchaseService::new(state.pool(), state.cache())
                .already_bought(current_user.as_ref(), product_id)
                .await?
        }
        None => false,
    };

    Ok(ProductTemplate {
        current_user,
        product,
        already_bought,
    })
}

/// Buy a product, then show the buyer's purchase history.
#[instrument(skip_all, fields(product_id = %product_id, user_id = %user.id))]
pub async fn buy(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    RequireAuth(user): RequireAuth,
) -> Result<Redirect> {
    let product_id = ProductId::new(lenient_i32(&product_id));
    let history_id = PurchaseService::new(state.pool(), state.cache())
        .buy(product_id, &user)
        .await?;

    tracing::info!(%history_id, "purchase recorded");
    Ok(Redirect::to(&format!("/users/{}", user.id)))
}
