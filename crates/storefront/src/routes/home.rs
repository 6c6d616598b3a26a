//! Catalog home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::PageContext;
use crate::models::Product;
use crate::state::AppState;

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
    pub products: Vec<Product>,
}

/// List every product.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, ctx: PageContext) -> Result<IndexTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    tracing::debug!(count = products.len(), "Rendering catalog");

    Ok(IndexTemplate { ctx, products })
}
