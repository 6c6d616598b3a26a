//! Admin panel route handlers.
//!
//! Every handler takes [`RequireAdmin`], so non-admins get `403 Access denied!`
//! before any form is read or any row is touched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use smart_gadgets_core::ProductId;

use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::forms::ProductForm;
use crate::middleware::{PageContext, RequireAdmin};
use crate::models::{Order, Product};
use crate::services::{notices, uploads};
use crate::state::AppState;

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub ctx: PageContext,
    pub products: Vec<Product>,
}

/// Add product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/add.html")]
pub struct AdminAddTemplate {
    pub ctx: PageContext,
}

/// Edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit.html")]
pub struct AdminEditTemplate {
    pub ctx: PageContext,
    pub product: Product,
}

/// All orders template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<Order>,
}

fn product_not_found(id: ProductId) -> AppError {
    AppError::NotFound(format!("product {id}"))
}

/// Save the uploaded image, if any, returning its stored name.
async fn store_image(state: &AppState, form: &ProductForm) -> Result<Option<String>> {
    let Some(upload) = &form.image else {
        return Ok(None);
    };

    let stored =
        uploads::save_image(&state.config().upload_dir, &upload.filename, &upload.bytes).await?;
    Ok(Some(stored))
}

/// List every product with edit/delete links.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<AdminIndexTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(AdminIndexTemplate { ctx, products })
}

/// Display the add product form.
pub async fn add_page(_admin: RequireAdmin, ctx: PageContext) -> AdminAddTemplate {
    AdminAddTemplate { ctx }
}

/// Create a product from the submitted form.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn add(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = ProductForm::from_multipart(multipart).await?;
    let image = store_image(&state, &form).await?;

    let product = ProductRepository::new(state.pool())
        .create(&form.into_new_product(image))
        .await?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");

    notices::success(&session, "Product added!").await?;
    Ok(Redirect::to("/admin"))
}

/// Display the edit form for an existing product.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn edit_page(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    ctx: PageContext,
) -> Result<AdminEditTemplate> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| product_not_found(id))?;

    Ok(AdminEditTemplate { ctx, product })
}

/// Apply the submitted form to an existing product.
///
/// The current image is kept unless a new file was uploaded.
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    let products = ProductRepository::new(state.pool());
    if products.get_by_id(id).await?.is_none() {
        return Err(product_not_found(id));
    }

    let form = ProductForm::from_multipart(multipart).await?;
    let image = store_image(&state, &form).await?;

    products
        .update(id, &form.into_new_product(image))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => product_not_found(id),
            other => AppError::Database(other),
        })?;
    tracing::info!("Product updated");

    notices::success(&session, "Product updated!").await?;
    Ok(Redirect::to("/admin"))
}

/// Delete a product. Past orders keep their captured line items.
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    session: Session,
) -> Result<Redirect> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => product_not_found(id),
            other => AppError::Database(other),
        })?;
    tracing::info!("Product deleted");

    notices::success(&session, "Product deleted!").await?;
    Ok(Redirect::to("/admin"))
}

/// List every order, newest first.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn orders(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<AdminOrdersTemplate> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(AdminOrdersTemplate { ctx, orders })
}
