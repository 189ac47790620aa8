//! Axum route handlers for the admin CRUD API.
//!
//! Every write validates its input before touching the store. Creates answer
//! `201`, deletes `204`, updates return the stored row.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{
    Certification, CertificationInput, Contact, Experience, ExperienceInput, Label, LabelInput,
    LabelKind, Project, ProjectInput, Skill, SkillInput, User, UserInput,
};
use crate::state::AppState;

// ── Profile ────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Result<Json<User>, AppError> {
    let profile = state
        .store
        .get_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// PUT /api/v1/admin/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, AppError> {
    input.validate()?;
    input.check_media_keys()?;
    Ok(Json(state.store.save_profile(input).await?))
}

/// DELETE /api/v1/admin/profile
pub async fn handle_delete_profile(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.delete_profile().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Skill categories, technologies, tags ───────────────────────────────────
// Mounted once per `LabelKind`; see `routes::label_routes`.

pub async fn list_labels(state: AppState, kind: LabelKind) -> Result<Json<Vec<Label>>, AppError> {
    Ok(Json(state.store.list_labels(kind).await?))
}

pub async fn create_label(
    state: AppState,
    kind: LabelKind,
    input: LabelInput,
) -> Result<(StatusCode, Json<Label>), AppError> {
    let name = input.validated_name(kind)?;
    let label = state.store.create_label(kind, name).await?;
    Ok((StatusCode::CREATED, Json(label)))
}

pub async fn rename_label(
    state: AppState,
    kind: LabelKind,
    id: Uuid,
    input: LabelInput,
) -> Result<Json<Label>, AppError> {
    let name = input.validated_name(kind)?;
    Ok(Json(state.store.rename_label(kind, id, name).await?))
}

/// Deleting a skill category also deletes its skills.
pub async fn delete_label(
    state: AppState,
    kind: LabelKind,
    id: Uuid,
) -> Result<StatusCode, AppError> {
    state.store.delete_label(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Skills ─────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(state.store.list_skills().await?))
}

/// POST /api/v1/admin/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    Json(input): Json<SkillInput>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    input.validate()?;
    let skill = state.store.create_skill(input).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// PUT /api/v1/admin/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SkillInput>,
) -> Result<Json<Skill>, AppError> {
    input.validate()?;
    Ok(Json(state.store.update_skill(id, input).await?))
}

/// DELETE /api/v1/admin/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_skill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Experiences ────────────────────────────────────────────────────────────

/// GET /api/v1/admin/experiences
pub async fn handle_list_experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<Experience>>, AppError> {
    Ok(Json(state.store.list_experiences().await?))
}

/// GET /api/v1/admin/experiences/:id
pub async fn handle_get_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Experience>, AppError> {
    Ok(Json(state.store.get_experience(id).await?))
}

/// POST /api/v1/admin/experiences
pub async fn handle_create_experience(
    State(state): State<AppState>,
    Json(input): Json<ExperienceInput>,
) -> Result<(StatusCode, Json<Experience>), AppError> {
    input.validate()?;
    let experience = state.store.create_experience(input).await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

/// PUT /api/v1/admin/experiences/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ExperienceInput>,
) -> Result<Json<Experience>, AppError> {
    input.validate()?;
    Ok(Json(state.store.update_experience(id, input).await?))
}

/// DELETE /api/v1/admin/experiences/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_experience(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Projects ───────────────────────────────────────────────────────────────

/// GET /api/v1/admin/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.store.list_projects().await?))
}

/// GET /api/v1/admin/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(state.store.get_project(id).await?))
}

/// POST /api/v1/admin/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    input.validate()?;
    input.check_media_keys()?;
    let project = state.store.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/v1/admin/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>, AppError> {
    input.validate()?;
    input.check_media_keys()?;
    Ok(Json(state.store.update_project(id, input).await?))
}

/// DELETE /api/v1/admin/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Contacts (read-only) ───────────────────────────────────────────────────

/// GET /api/v1/admin/contacts
pub async fn handle_list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.store.list_contacts().await?))
}

// ── Certifications ─────────────────────────────────────────────────────────

/// GET /api/v1/admin/certifications
pub async fn handle_list_certifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Certification>>, AppError> {
    Ok(Json(state.store.list_certifications().await?))
}

/// GET /api/v1/admin/certifications/:id
pub async fn handle_get_certification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Certification>, AppError> {
    Ok(Json(state.store.get_certification(id).await?))
}

/// POST /api/v1/admin/certifications
pub async fn handle_create_certification(
    State(state): State<AppState>,
    Json(input): Json<CertificationInput>,
) -> Result<(StatusCode, Json<Certification>), AppError> {
    input.validate()?;
    input.check_media_keys()?;
    let certification = state.store.create_certification(input).await?;
    Ok((StatusCode::CREATED, Json(certification)))
}

/// PUT /api/v1/admin/certifications/:id
pub async fn handle_update_certification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CertificationInput>,
) -> Result<Json<Certification>, AppError> {
    input.validate()?;
    input.check_media_keys()?;
    Ok(Json(state.store.update_certification(id, input).await?))
}

/// DELETE /api/v1/admin/certifications/:id
pub async fn handle_delete_certification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_certification(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
