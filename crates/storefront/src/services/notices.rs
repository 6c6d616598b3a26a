//! Flash notices.
//!
//! A notice is queued in the session by one request and shown (then dropped)
//! by the next page render.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// How a notice is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    /// CSS class suffix for templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push(
    session: &Session,
    level: NoticeLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<Notice> = session
        .get(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    queued.push(Notice {
        level,
        message: message.into(),
    });
    session.insert(session_keys::NOTICES, queued).await
}

/// Queue a success notice.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn success(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, NoticeLevel::Success, message).await
}

/// Queue an informational notice.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn info(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, NoticeLevel::Info, message).await
}

/// Queue an error notice.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push(session, NoticeLevel::Error, message).await
}

/// Return the queued notices without removing them.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn peek(session: &Session) -> Result<Vec<Notice>, tower_sessions::session::Error> {
    Ok(session
        .get::<Vec<Notice>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default())
}

/// Remove and return every queued notice.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn take(session: &Session) -> Result<Vec<Notice>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Notice>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default())
}
