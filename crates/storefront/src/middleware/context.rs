//! Per-request page context.
//!
//! Everything the shared layout needs from the session: who is logged in,
//! how many items are in the cart, and the notices queued by the previous
//! request. Notices stay queued until [`drain_rendered_notices`] sees a page
//! actually rendered, so a 404 or 500 does not swallow them.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::services::{cart, notices, notices::Notice};

/// Session-derived data for rendering a page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub cart_count: u32,
    pub notices: Vec<Notice>,
}

impl PageContext {
    /// Whether the visitor may see admin links.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Load the context from a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;
        let cart_count = cart::load(session).await?.item_count();
        let notices = notices::peek(session).await?;

        Ok(Self {
            user,
            cart_count,
            notices,
        })
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(AppError::Internal("session layer missing".to_string()));
        };
        Ok(Self::load(session).await?)
    }
}

/// Drop the queued notices once a page has been rendered.
///
/// Only successful HTML responses count; redirects, errors and static files
/// leave the queue alone. Must run inside the session layer.
pub async fn drain_rendered_notices(request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let response = next.run(request).await;

    let rendered = response.status().is_success()
        && response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));

    if rendered
        && let Some(session) = session
        && let Err(e) = notices::take(&session).await
    {
        tracing::warn!(error = %e, "Failed to drain notices");
    }

    response
}
