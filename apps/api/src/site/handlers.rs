use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::media::display_file_name;
use crate::models::{Contact, ContactForm};
use crate::site::home::{build_home_page, HomePage};
use crate::state::AppState;

/// GET /
pub async fn handle_home(State(state): State<AppState>) -> Result<Json<HomePage>, AppError> {
    Ok(Json(build_home_page(state.store.as_ref()).await?))
}

/// POST /contact/
/// Validates the form before anything is written; an invalid submission stores nothing.
pub async fn handle_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    form.validate()?;
    let contact = state.store.create_contact(form).await?;
    info!("Contact form submitted: {contact}");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /download-resume/
pub async fn handle_download_resume(State(state): State<AppState>) -> Result<Response, AppError> {
    let profile = state
        .store
        .get_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("No profile has been published".to_string()))?;
    let key = profile
        .resume
        .ok_or_else(|| AppError::NotFound("No resume has been uploaded".to_string()))?;
    let object = state
        .media
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume file '{key}' is missing")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        display_file_name(&key).replace('"', "")
    );
    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        object.bytes,
    )
        .into_response())
}
