//! Cart to order flow.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use smart_gadgets_integration_tests::TestApp;
use smart_gadgets_storefront::db::{OrderRepository, ProductRepository};

#[tokio::test]
async fn test_guest_checkout_creates_order_with_line_items() {
    let app = TestApp::spawn().await;
    let a = app.create_product("Smart Lamp", "10.00", 7).await;
    let b = app.create_product("Smart Plug", "5.00", 3).await;

    let mut browser = app.browser();
    browser.add_to_cart(a.id).await;
    browser.add_to_cart(a.id).await;
    browser.add_to_cart(b.id).await;

    let cart = browser.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert!(cart.body.contains("Cart (3)"));
    assert!(cart.body.contains("$25.00"));

    let confirm = browser.get("/checkout").await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("$25.00"));

    let placed = browser.post_form("/checkout", &[]).await;
    assert_eq!(placed.status, StatusCode::SEE_OTHER);
    assert_eq!(placed.location(), Some("/"));

    let home = browser.get("/").await;
    assert!(home.body.contains("placed successfully! Total: $25.00"));
    assert!(home.body.contains("Cart (0)"));

    let orders = OrderRepository::new(&app.pool);
    let all = orders.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    let order = &all[0];
    assert_eq!(order.total.cents(), 2500);
    assert!(order.user_id.is_none());

    let items = orders.items_for_order(order.id).await.unwrap();
    assert_eq!(items.len(), 2);
    let lamp = items.iter().find(|i| i.product_id == Some(a.id)).unwrap();
    assert_eq!(lamp.quantity, 2);
    assert_eq!(lamp.price.cents(), 1000);
    let plug = items.iter().find(|i| i.product_id == Some(b.id)).unwrap();
    assert_eq!(plug.quantity, 1);
    assert_eq!(plug.price.cents(), 500);

    let summed: i64 = items.iter().map(|i| i.subtotal().cents()).sum();
    assert_eq!(summed, order.total.cents());
}

#[tokio::test]
async fn test_checkout_does_not_touch_stock() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Smart Lamp", "10.00", 7).await;

    let mut browser = app.browser();
    browser.add_to_cart(product.id).await;
    browser.post_form("/checkout", &[]).await;

    assert_eq!(app.product(product.id).await.unwrap().stock, 7);
}

#[tokio::test]
async fn test_empty_cart_checkout_redirects_home() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    let confirm = browser.get("/checkout").await;
    assert_eq!(confirm.location(), Some("/"));

    let placed = browser.post_form("/checkout", &[]).await;
    assert_eq!(placed.status, StatusCode::SEE_OTHER);
    assert_eq!(placed.location(), Some("/"));

    let home = browser.get("/").await;
    assert!(home.body.contains("Your cart is empty!"));

    assert!(OrderRepository::new(&app.pool).list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_product_aborts_checkout_and_is_dropped_from_cart() {
    let app = TestApp::spawn().await;
    let kept = app.create_product("Smart Lamp", "10.00", 1).await;
    let gone = app.create_product("Smart Plug", "5.00", 1).await;

    let mut browser = app.browser();
    browser.add_to_cart(kept.id).await;
    browser.add_to_cart(gone.id).await;

    ProductRepository::new(&app.pool).delete(gone.id).await.unwrap();

    let aborted = browser.post_form("/checkout", &[]).await;
    assert_eq!(aborted.location(), Some("/cart"));
    assert!(OrderRepository::new(&app.pool).list_all().await.unwrap().is_empty());

    let cart = browser.get("/cart").await;
    assert!(cart.body.contains("no longer available"));
    assert!(cart.body.contains("Cart (1)"));
    assert!(cart.body.contains("Smart Lamp"));

    let placed = browser.post_form("/checkout", &[]).await;
    assert_eq!(placed.location(), Some("/"));

    let orders = OrderRepository::new(&app.pool).list_all().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total.cents(), 1000);
}

#[tokio::test]
async fn test_logged_in_checkout_records_owner() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Smart Lamp", "10.00", 1).await;

    let mut browser = app.customer_browser("carol").await;
    browser.add_to_cart(product.id).await;
    browser.post_form("/checkout", &[]).await;

    let orders = OrderRepository::new(&app.pool).list_all().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert!(orders[0].user_id.is_some());
}

#[tokio::test]
async fn test_cart_survives_login() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Smart Lamp", "10.00", 1).await;

    let mut browser = app.browser();
    browser.add_to_cart(product.id).await;
    browser.register("dave", "dave-password").await;
    browser.login("dave", "dave-password").await;

    let cart = browser.get("/cart").await;
    assert!(cart.body.contains("Cart (1)"));
}

#[tokio::test]
async fn test_notice_survives_error_page() {
    let app = TestApp::spawn().await;
    let lamp = app.create_product("Smart Lamp", "10.00", 7).await;

    let mut browser = app.browser();
    browser.add_to_cart(lamp.id).await;

    let missing = browser.get("/product/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(!missing.body.contains("Product added to cart!"));

    let home = browser.get("/").await;
    assert!(home.body.contains("Product added to cart!"));

    let again = browser.get("/").await;
    assert!(!again.body.contains("Product added to cart!"));
}
