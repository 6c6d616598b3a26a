//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{OptionalAuth, PageContext};
use crate::services::cart::{self, PricedCart};
use crate::services::checkout::{CheckoutError, CheckoutService};
use crate::services::notices;
use crate::state::AppState;

const EMPTY_CART: &str = "Your cart is empty!";

/// Checkout confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    pub cart: PricedCart,
}

/// Show the order summary for confirmation.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let current = cart::load(&session).await?;

    match CheckoutService::new(state.pool()).preview(&current).await {
        Ok(priced) => {
            let ctx = PageContext::load(&session).await?;
            Ok(CheckoutTemplate { ctx, cart: priced }.into_response())
        }
        Err(CheckoutError::EmptyCart) => {
            notices::error(&session, EMPTY_CART).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Place the order.
///
/// Success clears the cart and returns to the catalog. If products vanished
/// since they were added, nothing is written: they are dropped from the cart
/// and the visitor is sent back to review it.
#[instrument(skip_all, fields(user_id))]
pub async fn submit(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Redirect> {
    let user_id = user.map(|u| u.id);
    if let Some(id) = user_id {
        tracing::Span::current().record("user_id", tracing::field::display(id));
    }

    let mut current = cart::load(&session).await?;

    match CheckoutService::new(state.pool())
        .submit(&current, user_id)
        .await
    {
        Ok(placed) => {
            cart::clear(&session).await?;
            notices::success(
                &session,
                format!(
                    "Order #{} placed successfully! Total: {}",
                    placed.order.id, placed.order.total
                ),
            )
            .await?;
            Ok(Redirect::to("/"))
        }
        Err(CheckoutError::EmptyCart) => {
            notices::error(&session, EMPTY_CART).await?;
            Ok(Redirect::to("/"))
        }
        Err(CheckoutError::ProductsUnavailable(missing)) => {
            for id in missing {
                current.remove(id);
            }
            cart::save(&session, &current).await?;
            notices::error(
                &session,
                "Some products are no longer available and were removed from your cart. \
                 Please review it before checking out.",
            )
            .await?;
            Ok(Redirect::to("/cart"))
        }
        Err(CheckoutError::TotalOverflow) => {
            notices::error(&session, "Order total is too large; please reduce quantities.")
                .await?;
            Ok(Redirect::to("/cart"))
        }
        Err(e @ CheckoutError::Repository(_)) => Err(e.into()),
    }
}
