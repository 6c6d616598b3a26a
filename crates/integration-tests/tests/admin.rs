//! Product CRUD through the admin panel.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use smart_gadgets_integration_tests::TestApp;
use smart_gadgets_storefront::db::ProductRepository;
use smart_gadgets_storefront::models::product::{MAX_NAME_LENGTH, NO_IMAGE};

fn product_fields<'a>(name: &'a str, price: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", name),
        ("price", price),
        ("description", "Shiny"),
        ("category", "gadgets"),
        ("stock", "4"),
    ]
}

#[tokio::test]
async fn test_non_admin_is_denied_everywhere() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Smart Lamp", "10.00", 1).await;
    let mut customer = app.customer_browser("carol").await;
    let mut guest = app.browser();

    for browser in [&mut customer, &mut guest] {
        for uri in [
            "/admin".to_owned(),
            "/admin/add".to_owned(),
            "/admin/orders".to_owned(),
            format!("/admin/edit/{}", product.id),
            format!("/admin/delete/{}", product.id),
        ] {
            let response = browser.get(&uri).await;
            assert_eq!(response.status, StatusCode::FORBIDDEN, "{uri}");
            assert_eq!(response.body, "Access denied!");
        }

        let response = browser
            .post_multipart("/admin/add", &product_fields("Sneaky", "1.00"), None)
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    // Nothing changed
    let products = ProductRepository::new(&app.pool).list_all().await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_add_product_without_image() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    let response = admin
        .post_multipart("/admin/add", &product_fields("Smart Lamp", "19.99"), None)
        .await;
    assert_eq!(response.location(), Some("/admin"));

    let page = admin.get("/admin").await;
    assert!(page.body.contains("Product added!"));
    assert!(page.body.contains("Smart Lamp"));

    let products = ProductRepository::new(&app.pool).list_all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price.cents(), 1999);
    assert_eq!(products[0].stock, 4);
    assert_eq!(products[0].image, NO_IMAGE);
}

#[tokio::test]
async fn test_add_product_with_image_upload() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    let response = admin
        .post_multipart(
            "/admin/add",
            &product_fields("Smart Lamp", "19.99"),
            Some(("image", "../../lamp photo.png", b"\x89PNG fake".as_slice())),
        )
        .await;
    assert_eq!(response.location(), Some("/admin"));

    let products = ProductRepository::new(&app.pool).list_all().await.unwrap();
    let stored = &products[0].image;
    assert!(stored.ends_with("-lamp_photo.png"), "{stored}");

    let saved = std::fs::read(app.upload_dir.join(stored)).unwrap();
    assert_eq!(saved, b"\x89PNG fake");

    let served = admin.get(&format!("/uploads/{stored}")).await;
    assert_eq!(served.status, StatusCode::OK);
}

#[tokio::test]
async fn test_same_upload_name_keeps_both_images() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    for (name, bytes) in [("Smart Lamp", b"AAAA"), ("Smart Plug", b"BBBB")] {
        let response = admin
            .post_multipart(
                "/admin/add",
                &product_fields(name, "19.99"),
                Some(("image", "photo.png", bytes.as_slice())),
            )
            .await;
        assert_eq!(response.location(), Some("/admin"));
    }

    let products = ProductRepository::new(&app.pool).list_all().await.unwrap();
    assert_ne!(products[0].image, products[1].image);
    assert_eq!(
        std::fs::read(app.upload_dir.join(&products[0].image)).unwrap(),
        b"AAAA"
    );
    assert_eq!(
        std::fs::read(app.upload_dir.join(&products[1].image)).unwrap(),
        b"BBBB"
    );
}

#[tokio::test]
async fn test_upload_cannot_replace_placeholder() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    let response = admin
        .post_multipart(
            "/admin/add",
            &product_fields("Smart Lamp", "19.99"),
            Some(("image", NO_IMAGE, b"<svg/>".as_slice())),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!app.upload_dir.join(NO_IMAGE).exists());
}

#[tokio::test]
async fn test_unsupported_upload_type_is_rejected() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    let response = admin
        .post_multipart(
            "/admin/add",
            &product_fields("Smart Lamp", "19.99"),
            Some(("image", "payload.html", b"<script></script>".as_slice())),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(ProductRepository::new(&app.pool).list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_form_is_bad_request() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    let response = admin
        .post_multipart("/admin/add", &product_fields("Smart Lamp", "cheap"), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("price"));

    let response = admin
        .post_multipart("/admin/add", &[("name", "Smart Lamp")], None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "missing field: price");

    let long_name = "x".repeat(MAX_NAME_LENGTH + 1);
    let response = admin
        .post_multipart("/admin/add", &product_fields(&long_name, "19.99"), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("name"));
    assert!(ProductRepository::new(&app.pool).list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_keeps_image_when_none_uploaded() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;
    admin
        .post_multipart(
            "/admin/add",
            &product_fields("Smart Lamp", "19.99"),
            Some(("image", "lamp.jpg", b"jpeg".as_slice())),
        )
        .await;
    let original = ProductRepository::new(&app.pool).list_all().await.unwrap().remove(0);
    let id = original.id;

    let form = admin.get(&format!("/admin/edit/{id}")).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("Smart Lamp"));

    let response = admin
        .post_multipart(
            &format!("/admin/edit/{id}"),
            &product_fields("Smarter Lamp", "24.50"),
            None,
        )
        .await;
    assert_eq!(response.location(), Some("/admin"));

    let product = app.product(id).await.unwrap();
    assert_eq!(product.name, "Smarter Lamp");
    assert_eq!(product.price.cents(), 2450);
    assert_eq!(product.image, original.image);
    assert!(product.image.ends_with("-lamp.jpg"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;
    let mut admin = app.admin_browser().await;

    assert_eq!(admin.get("/admin/edit/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(admin.get("/admin/delete/999").await.status, StatusCode::NOT_FOUND);

    let response = admin
        .post_multipart("/admin/edit/999", &product_fields("Ghost", "1.00"), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let mut guest = app.browser();
    assert_eq!(guest.get("/product/999").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Smart Lamp", "10.00", 1).await;
    let mut admin = app.admin_browser().await;

    let response = admin.get(&format!("/admin/delete/{}", product.id)).await;
    assert_eq!(response.location(), Some("/admin"));
    assert!(app.product(product.id).await.is_none());

    let page = admin.get("/admin").await;
    assert!(page.body.contains("Product deleted!"));
}
