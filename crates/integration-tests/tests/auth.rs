//! Registration, login and the admin gate.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use smart_gadgets_integration_tests::TestApp;

#[tokio::test]
async fn test_register_then_login_and_logout() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    let registered = browser.register("alice", "alice-password").await;
    assert_eq!(registered.location(), Some("/login"));
    let page = browser.get("/login").await;
    assert!(page.body.contains("Registration successful! Please log in."));

    let logged_in = browser.login("alice", "alice-password").await;
    assert_eq!(logged_in.location(), Some("/"));
    let home = browser.get("/").await;
    assert!(home.body.contains("Logged in successfully!"));
    assert!(home.body.contains("alice"));
    assert!(home.body.contains("/logout"));

    let logged_out = browser.get("/logout").await;
    assert_eq!(logged_out.location(), Some("/"));
    let home = browser.get("/").await;
    assert!(home.body.contains("You have been logged out."));
    assert!(!home.body.contains("/logout"));
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    browser.register("alice", "alice-password").await;
    let again = browser.register("alice", "other-password").await;
    assert_eq!(again.location(), Some("/register"));

    let page = browser.get("/register").await;
    assert!(page.body.contains("User already exists!"));
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    let response = browser.register("alice", "short").await;
    assert_eq!(response.location(), Some("/register"));

    let page = browser.get("/register").await;
    assert!(page.body.contains("Invalid password"));

    let login = browser.login("alice", "short").await;
    assert_eq!(login.location(), Some("/login"));
}

#[tokio::test]
async fn test_wrong_password_never_grants_admin() {
    let app = TestApp::spawn().await;
    app.create_admin("boss", "boss-password").await;

    let mut browser = app.browser();
    let response = browser.login("boss", "not-the-password").await;
    assert_eq!(response.location(), Some("/login"));

    let page = browser.get("/login").await;
    assert!(page.body.contains("Invalid username or password!"));

    let admin = browser.get("/admin").await;
    assert_eq!(admin.status, StatusCode::FORBIDDEN);
    assert_eq!(admin.body, "Access denied!");
}

#[tokio::test]
async fn test_unknown_user_gets_same_message() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    browser.login("nobody", "whatever-password").await;
    let page = browser.get("/login").await;
    assert!(page.body.contains("Invalid username or password!"));
}

#[tokio::test]
async fn test_admin_login_reaches_admin_panel() {
    let app = TestApp::spawn().await;
    let mut browser = app.admin_browser().await;

    let admin = browser.get("/admin").await;
    assert_eq!(admin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_orders_require_login() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    let response = browser.get("/orders").await;
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    let live = browser.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = browser.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}
