//! POST /upload_media/ - accept a file and report what was received.
//!
//! The body is read chunk by chunk and only counted; nothing is stored.

use axum::Json;
use axum::extract::Multipart;

use parlance_types::upload::UploadInfo;

use crate::http::error::AppError;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// POST /upload_media/
pub async fn upload_media(mut multipart: Multipart) -> Result<Json<UploadInfo>, AppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len() as u64;
        }

        tracing::info!(
            filename = filename.as_deref().unwrap_or(""),
            content_type = content_type.as_deref().unwrap_or(""),
            size,
            "Media received"
        );

        return Ok(Json(UploadInfo {
            filename,
            content_type,
            size,
        }));
    }

    Err(AppError::Validation(format!("{FILE_FIELD} is required")))
}
