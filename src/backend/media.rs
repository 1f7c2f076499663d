//! Media Upload Handler
//!
//! POST /api/media/upload proxies one multipart file to the media host and
//! returns the hosted URL. The platform never stores file bytes itself.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::backend::adapters::MediaClient;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

/// 25 MB cap, matching the media host's own limit
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub async fn upload_media(
    State(media): State<MediaClient>,
    AuthUser(current): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !media.is_configured() {
        return Err(ApiError::Unconfigured("media hosting"));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("failed to read upload: {}", e)))?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::validation("File exceeds the 25 MB upload limit"));
        }

        let url = media.upload(file_name, content_type, bytes.to_vec()).await?;
        tracing::info!("{} uploaded media: {}", current.username, url);
        return Ok(Json(serde_json::json!({ "url": url })));
    }

    Err(ApiError::validation("Missing 'file' field"))
}
