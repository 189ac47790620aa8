use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::media::{guess_content_type, object_key, StoredMedia, UploadDir};
use crate::state::AppState;

/// POST /api/v1/admin/uploads/:dir
/// Stores the multipart `file` field under the upload directory and returns its object key,
/// which is then set on the owning entity (e.g. `resume` on the profile).
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(dir): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredMedia>), AppError> {
    let dir = UploadDir::from_prefix(&dir)
        .ok_or_else(|| AppError::NotFound(format!("Unknown upload directory '{dir}'")))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid("file", e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(&file_name));
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid("file", e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::invalid("file", "The submitted file is empty"));
        }

        let key = object_key(dir, &file_name);
        let size = bytes.len();
        state.media.put(&key, bytes, &content_type).await?;
        return Ok((
            StatusCode::CREATED,
            Json(StoredMedia {
                key,
                content_type,
                size,
            }),
        ));
    }

    Err(AppError::invalid("file", "No file was submitted"))
}
