//! Integration tests for the Smart Gadgets store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p smart-gadgets-integration-tests
//! ```
//!
//! Every test builds the real router over a fresh in-memory SQLite database
//! and an in-memory session store, then drives it with
//! `tower::ServiceExt::oneshot`. No server or external database is needed.
//!
//! # Test Categories
//!
//! - `checkout` - Cart to order flow and its failure cases
//! - `auth` - Registration, login and the admin gate
//! - `admin` - Product CRUD through the admin panel
//! - `orders` - Order history and captured line items

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use smart_gadgets_core::{Price, ProductId};
use smart_gadgets_storefront::build_router;
use smart_gadgets_storefront::config::StoreConfig;
use smart_gadgets_storefront::db::{self, ProductRepository};
use smart_gadgets_storefront::middleware::session::SESSION_COOKIE_NAME;
use smart_gadgets_storefront::models::{NewProduct, Product};
use smart_gadgets_storefront::services::auth::AuthService;
use smart_gadgets_storefront::state::AppState;

const BOUNDARY: &str = "sg-test-boundary";

/// A store running in-process.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub upload_dir: PathBuf,
}

impl TestApp {
    /// Fresh database, schema applied, no products or users.
    pub async fn spawn() -> Self {
        let upload_dir = std::env::temp_dir().join(format!("sg-test-{}", uuid::Uuid::new_v4()));
        let config = StoreConfig::for_tests(upload_dir.clone());

        let pool = db::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .expect("in-memory pool");
        db::migrate(&pool).await.expect("migrations apply");

        let state = AppState::new(config, pool.clone());
        let router = build_router(state, MemoryStore::default());

        Self {
            router,
            pool,
            upload_dir,
        }
    }

    /// A browser with an empty cookie jar.
    #[must_use]
    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            session_cookie: None,
        }
    }

    /// Insert a product directly.
    pub async fn create_product(&self, name: &str, price: &str, stock: u32) -> Product {
        ProductRepository::new(&self.pool)
            .create(&NewProduct {
                name: name.to_owned(),
                price: Price::parse(price).unwrap(),
                description: format!("{name} description"),
                category: "gadgets".to_owned(),
                stock,
                image: None,
            })
            .await
            .unwrap()
    }

    /// Look a product up directly.
    pub async fn product(&self, id: ProductId) -> Option<Product> {
        ProductRepository::new(&self.pool).get_by_id(id).await.unwrap()
    }

    /// Create an administrator account.
    pub async fn create_admin(&self, username: &str, password: &str) {
        AuthService::new(&self.pool)
            .create_admin(username, password)
            .await
            .unwrap();
    }

    /// A browser already logged in as a fresh administrator.
    pub async fn admin_browser(&self) -> Browser {
        self.create_admin("boss", "boss-password").await;
        let mut browser = self.browser();
        let response = browser.login("boss", "boss-password").await;
        assert_eq!(response.location(), Some("/"));
        browser
    }

    /// A browser logged in as a fresh customer.
    pub async fn customer_browser(&self, username: &str) -> Browser {
        let mut browser = self.browser();
        browser.register(username, "customer-password").await;
        let response = browser.login(username, "customer-password").await;
        assert_eq!(response.location(), Some("/"));
        browser
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// One client with its own session cookie.
pub struct Browser {
    router: Router,
    session_cookie: Option<String>,
}

impl Browser {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri);
        self.send(request, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(request, Body::from(body)).await
    }

    /// Post a multipart form; `file` is `(field, filename, bytes)`.
    pub async fn post_multipart(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        self.send(request, Body::from(body)).await
    }

    pub async fn register(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/register", &[("username", username), ("password", password)])
            .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn add_to_cart(&mut self, id: ProductId) {
        let response = self.get(&format!("/cart/add/{id}")).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
    }

    async fn send(
        &mut self,
        mut request: axum::http::request::Builder,
        body: Body,
    ) -> TestResponse {
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            self.store_cookie(value.to_str().unwrap());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let Some(pair) = set_cookie.split(';').next() else {
            return;
        };
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        if name.trim() != SESSION_COOKIE_NAME {
            return;
        }

        let removed = value.is_empty() || set_cookie.to_ascii_lowercase().contains("max-age=0");
        self.session_cookie = if removed {
            None
        } else {
            Some(value.to_owned())
        };
    }
}

fn form_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                char::from(b).to_string()
            }
            b' ' => "+".to_owned(),
            other => format!("%{other:02X}"),
        })
        .collect()
}
