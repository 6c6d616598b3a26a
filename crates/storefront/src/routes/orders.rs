//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use smart_gadgets_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{Order, OrderItem};
use crate::state::AppState;

/// The user's order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<Order>,
}

/// Order receipt template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub ctx: PageContext,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// The logged-in user's orders, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<OrdersTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(OrdersTemplate { ctx, orders })
}

/// One order with its captured items.
///
/// Visible to the order's owner and to admins. Everyone else, including
/// for guest orders, gets a 404 so order ids can't be enumerated.
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    ctx: PageContext,
) -> Result<OrderTemplate> {
    let orders = OrderRepository::new(state.pool());
    let not_found = || AppError::NotFound(format!("order {id}"));

    let order = orders.get_by_id(id).await?.ok_or_else(not_found)?;
    if !user.is_admin && order.user_id != Some(user.id) {
        return Err(not_found());
    }

    let items = orders.items_for_order(order.id).await?;
    Ok(OrderTemplate { ctx, order, items })
}
