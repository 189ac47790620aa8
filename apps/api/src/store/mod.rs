//! Content Store — the persistence seam for every portfolio entity.
//!
//! `AppState` holds an `Arc<dyn ContentStore>`. Production uses `PgContentStore`;
//! tests run handlers against `MemoryContentStore`.
//!
//! Contract shared by all backends:
//! - ids are assigned by the store on create
//! - `created_at` is set once on insert, `updated_at` on insert and every update
//! - projects list by `created_at DESC`, certifications by `issue_date DESC`
//! - deleting a skill category deletes its skills
//! - a dangling category/technology/tag id fails the write with `AppError::Integrity`
//! - update/delete of a missing row fails with `AppError::NotFound`

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Certification, CertificationInput, Contact, ContactForm, Experience, ExperienceInput, Label,
    LabelKind, Project, ProjectInput, Skill, SkillInput, User, UserInput,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

#[async_trait]
pub trait ContentStore: Send + Sync {
    // ── Profile (singleton) ────────────────────────────────────────────────

    async fn get_profile(&self) -> Result<Option<User>, AppError>;

    /// Creates the profile, or replaces the existing one keeping its id.
    async fn save_profile(&self, input: UserInput) -> Result<User, AppError>;

    async fn delete_profile(&self) -> Result<(), AppError>;

    // ── Skill categories, technologies, tags ───────────────────────────────

    async fn list_labels(&self, kind: LabelKind) -> Result<Vec<Label>, AppError>;

    /// `name` must already be validated.
    async fn create_label(&self, kind: LabelKind, name: String) -> Result<Label, AppError>;

    async fn rename_label(&self, kind: LabelKind, id: Uuid, name: String)
        -> Result<Label, AppError>;

    async fn delete_label(&self, kind: LabelKind, id: Uuid) -> Result<(), AppError>;

    // ── Skills ─────────────────────────────────────────────────────────────

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;

    async fn create_skill(&self, input: SkillInput) -> Result<Skill, AppError>;

    async fn update_skill(&self, id: Uuid, input: SkillInput) -> Result<Skill, AppError>;

    async fn delete_skill(&self, id: Uuid) -> Result<(), AppError>;

    // ── Experiences ────────────────────────────────────────────────────────

    async fn list_experiences(&self) -> Result<Vec<Experience>, AppError>;

    async fn get_experience(&self, id: Uuid) -> Result<Experience, AppError>;

    async fn create_experience(&self, input: ExperienceInput) -> Result<Experience, AppError>;

    async fn update_experience(
        &self,
        id: Uuid,
        input: ExperienceInput,
    ) -> Result<Experience, AppError>;

    async fn delete_experience(&self, id: Uuid) -> Result<(), AppError>;

    // ── Projects ───────────────────────────────────────────────────────────

    /// Newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;

    async fn get_project(&self, id: Uuid) -> Result<Project, AppError>;

    async fn create_project(&self, input: ProjectInput) -> Result<Project, AppError>;

    async fn update_project(&self, id: Uuid, input: ProjectInput) -> Result<Project, AppError>;

    async fn delete_project(&self, id: Uuid) -> Result<(), AppError>;

    // ── Contacts (append-only) ─────────────────────────────────────────────

    async fn create_contact(&self, form: ContactForm) -> Result<Contact, AppError>;

    /// Newest first.
    async fn list_contacts(&self) -> Result<Vec<Contact>, AppError>;

    // ── Certifications ─────────────────────────────────────────────────────

    /// Most recent issue date first.
    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError>;

    async fn get_certification(&self, id: Uuid) -> Result<Certification, AppError>;

    async fn create_certification(
        &self,
        input: CertificationInput,
    ) -> Result<Certification, AppError>;

    async fn update_certification(
        &self,
        id: Uuid,
        input: CertificationInput,
    ) -> Result<Certification, AppError>;

    async fn delete_certification(&self, id: Uuid) -> Result<(), AppError>;
}

pub(crate) fn not_found(noun: &str, id: Uuid) -> AppError {
    AppError::NotFound(format!("{noun} {id} not found"))
}
