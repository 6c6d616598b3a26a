//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use smart_gadgets_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::PageContext;
use crate::models::Product;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub ctx: PageContext,
    pub product: Product,
}

/// Display one product, 404 if the id is unknown.
#[instrument(skip(state, ctx))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    ctx: PageContext,
) -> Result<ProductTemplate> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductTemplate { ctx, product })
}
