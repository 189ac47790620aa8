pub mod health;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::admin::{auth::require_admin, handlers, uploads};
use crate::models::{LabelInput, LabelKind};
use crate::site::handlers as site;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public site
        .route("/", get(site::handle_home))
        .route("/contact/", post(site::handle_contact))
        .route("/download-resume/", get(site::handle_download_resume))
        // Admin API
        .nest("/api/v1/admin", admin_router(&state))
        .with_state(state)
}

fn admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::handle_get_profile)
                .put(handlers::handle_save_profile)
                .delete(handlers::handle_delete_profile),
        )
        .nest("/skill-categories", label_routes(LabelKind::SkillCategory))
        .nest("/technologies", label_routes(LabelKind::Technology))
        .nest("/tags", label_routes(LabelKind::Tag))
        .route(
            "/skills",
            get(handlers::handle_list_skills).post(handlers::handle_create_skill),
        )
        .route(
            "/skills/:id",
            put(handlers::handle_update_skill).delete(handlers::handle_delete_skill),
        )
        .route(
            "/experiences",
            get(handlers::handle_list_experiences).post(handlers::handle_create_experience),
        )
        .route(
            "/experiences/:id",
            get(handlers::handle_get_experience)
                .put(handlers::handle_update_experience)
                .delete(handlers::handle_delete_experience),
        )
        .route(
            "/projects",
            get(handlers::handle_list_projects).post(handlers::handle_create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::handle_get_project)
                .put(handlers::handle_update_project)
                .delete(handlers::handle_delete_project),
        )
        .route("/contacts", get(handlers::handle_list_contacts))
        .route(
            "/certifications",
            get(handlers::handle_list_certifications)
                .post(handlers::handle_create_certification),
        )
        .route(
            "/certifications/:id",
            get(handlers::handle_get_certification)
                .put(handlers::handle_update_certification)
                .delete(handlers::handle_delete_certification),
        )
        .route(
            "/uploads/:dir",
            post(uploads::handle_upload)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

/// CRUD routes for one name-only entity.
fn label_routes(kind: LabelKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |State(state): State<AppState>| handlers::list_labels(state, kind)).post(
                move |State(state): State<AppState>, Json(input): Json<LabelInput>| {
                    handlers::create_label(state, kind, input)
                },
            ),
        )
        .route(
            "/:id",
            put(
                move |State(state): State<AppState>,
                      Path(id): Path<Uuid>,
                      Json(input): Json<LabelInput>| {
                    handlers::rename_label(state, kind, id, input)
                },
            )
            .delete(
                move |State(state): State<AppState>, Path(id): Path<Uuid>| {
                    handlers::delete_label(state, kind, id)
                },
            ),
        )
}
