//! Product image uploads.
//!
//! Client-supplied file names are reduced to a safe basename before anything
//! touches the filesystem. Stored names carry a random prefix, so uploads
//! never replace one another.

use std::path::Path;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Image extensions accepted for product pictures.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing usable was left after sanitizing the file name.
    #[error("invalid file name")]
    InvalidFilename,

    /// The file is not one of the accepted image types.
    #[error("unsupported image type (allowed: jpg, jpeg, png, gif, webp)")]
    UnsupportedType,

    /// Writing the file failed.
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Reduce a client-supplied file name to a safe basename.
///
/// Directory components are dropped, whitespace becomes `_`, only ASCII
/// alphanumerics and `.`, `-`, `_` are kept, and leading dots or underscores
/// are stripped. Returns `None` when nothing remains.
#[must_use]
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let basename = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = basename
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_owned())
    }
}

/// Sanitize `raw_name` and write `bytes` under `dir`, returning the stored name.
///
/// The stored name is `{uuid}-{sanitized}`. Existing files are never
/// overwritten.
///
/// # Errors
///
/// Returns `UploadError::InvalidFilename` or `UploadError::UnsupportedType`
/// for unusable names, `UploadError::Io` if the write fails.
pub async fn save_image(dir: &Path, raw_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let filename = sanitize_filename(raw_name).ok_or(UploadError::InvalidFilename)?;

    let extension = Path::new(&filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(UploadError::UnsupportedType)?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedType);
    }

    let stored = format!("{}-{filename}", Uuid::new_v4());

    tokio::fs::create_dir_all(dir).await?;
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dir.join(&stored))
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;

    tracing::info!(filename = %stored, size = bytes.len(), "Stored product image");
    Ok(stored)
}
