//! Cart route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use smart_gadgets_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::PageContext;
use crate::services::cart::{self, PricedCart};
use crate::services::notices;
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
    pub cart: PricedCart,
}

/// Add one unit of a product to the cart and go back to the catalog.
#[instrument(skip(session))]
pub async fn add(Path(id): Path<ProductId>, session: Session) -> Result<Redirect> {
    let quantity = cart::add_item(&session, id).await?;
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", id.to_string()), ("quantity", quantity.to_string())],
    );

    notices::success(&session, "Product added to cart!").await?;
    Ok(Redirect::to("/"))
}

/// Show the cart with line subtotals and the grand total.
///
/// Entries whose product has since been deleted are not shown.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
) -> Result<CartTemplate> {
    let current = cart::load(&session).await?;
    let priced = cart::price_cart(state.pool(), &current).await?;

    Ok(CartTemplate { ctx, cart: priced })
}
