use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use super::{not_found, ContentStore};
use crate::errors::AppError;
use crate::models::{
    unique_ids, Certification, CertificationInput, Contact, ContactForm, Experience,
    ExperienceInput, Label, LabelKind, Project, ProjectInput, Skill, SkillInput, User, UserInput,
};

/// A many-to-many join table between an owner row and a label row.
struct LinkTable {
    table: &'static str,
    owner_column: &'static str,
    label_column: &'static str,
    labels: LabelKind,
}

const EXPERIENCE_TECHNOLOGIES: LinkTable = LinkTable {
    table: "experience_technologies",
    owner_column: "experience_id",
    label_column: "technology_id",
    labels: LabelKind::Technology,
};

const PROJECT_TECHNOLOGIES: LinkTable = LinkTable {
    table: "project_technologies",
    owner_column: "project_id",
    label_column: "technology_id",
    labels: LabelKind::Technology,
};

const PROJECT_TAGS: LinkTable = LinkTable {
    table: "project_tags",
    owner_column: "project_id",
    label_column: "tag_id",
    labels: LabelKind::Tag,
};

#[derive(FromRow)]
struct LinkedLabel {
    owner_id: Uuid,
    id: Uuid,
    name: String,
}

/// PostgreSQL-backed Content Store.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the labels linked to each of `owner_ids`, grouped by owner.
    async fn linked_labels(
        &self,
        link: &LinkTable,
        owner_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Label>>, AppError> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT j.{owner} AS owner_id, l.id, l.name \
             FROM {join} j JOIN {labels} l ON l.id = j.{label} \
             WHERE j.{owner} = ANY($1) \
             ORDER BY l.name",
            owner = link.owner_column,
            join = link.table,
            labels = link.labels.table(),
            label = link.label_column,
        );
        let rows: Vec<LinkedLabel> = sqlx::query_as(&sql)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<Label>> = HashMap::new();
        for row in rows {
            grouped.entry(row.owner_id).or_default().push(Label {
                id: row.id,
                name: row.name,
            });
        }
        Ok(grouped)
    }

    async fn attach_experience_links(
        &self,
        mut experiences: Vec<Experience>,
    ) -> Result<Vec<Experience>, AppError> {
        let ids: Vec<Uuid> = experiences.iter().map(|e| e.id).collect();
        let mut technologies = self.linked_labels(&EXPERIENCE_TECHNOLOGIES, &ids).await?;
        for experience in &mut experiences {
            experience.technologies = technologies.remove(&experience.id).unwrap_or_default();
        }
        Ok(experiences)
    }

    async fn attach_project_links(
        &self,
        mut projects: Vec<Project>,
    ) -> Result<Vec<Project>, AppError> {
        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let mut technologies = self.linked_labels(&PROJECT_TECHNOLOGIES, &ids).await?;
        let mut tags = self.linked_labels(&PROJECT_TAGS, &ids).await?;
        for project in &mut projects {
            project.technologies = technologies.remove(&project.id).unwrap_or_default();
            project.tags = tags.remove(&project.id).unwrap_or_default();
        }
        Ok(projects)
    }
}

/// Replaces the owner's link set. Unknown label ids fail with a foreign key violation.
async fn replace_links(
    tx: &mut Transaction<'_, Postgres>,
    link: &LinkTable,
    owner_id: Uuid,
    label_ids: &[Uuid],
) -> Result<(), AppError> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE {} = $1",
        link.table, link.owner_column
    ))
    .bind(owner_id)
    .execute(&mut **tx)
    .await?;

    let insert = format!(
        "INSERT INTO {} ({}, {}) VALUES ($1, $2)",
        link.table, link.owner_column, link.label_column
    );
    for label_id in unique_ids(label_ids) {
        sqlx::query(&insert)
            .bind(owner_id)
            .bind(label_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl ContentStore for PgContentStore {
    // ── Profile ────────────────────────────────────────────────────────────

    async fn get_profile(&self) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM profiles LIMIT 1")
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_profile(&self, input: UserInput) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        // Serializes concurrent saves, including the first one into an empty table;
        // plain reads are not blocked.
        sqlx::query("LOCK TABLE profiles IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM profiles LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
        let user = input.into_user(existing.unwrap_or_else(Uuid::new_v4));

        let sql = if existing.is_some() {
            r#"
            UPDATE profiles SET
                name = $2, title = $3, email = $4, about = $5, profile_image = $6,
                resume = $7, github_username = $8, github_url = $9,
                linkedin_username = $10, linkedin_url = $11
            WHERE id = $1
            "#
        } else {
            r#"
            INSERT INTO profiles
                (id, name, title, email, about, profile_image, resume,
                 github_username, github_url, linkedin_username, linkedin_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#
        };
        sqlx::query(sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.title)
            .bind(&user.email)
            .bind(&user.about)
            .bind(&user.profile_image)
            .bind(&user.resume)
            .bind(&user.github_username)
            .bind(&user.github_url)
            .bind(&user.linkedin_username)
            .bind(&user.linkedin_url)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Saved profile '{user}' ({})", user.id);
        Ok(user)
    }

    async fn delete_profile(&self) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM profiles")
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }
        info!("Deleted profile");
        Ok(())
    }

    // ── Labels ─────────────────────────────────────────────────────────────

    async fn list_labels(&self, kind: LabelKind) -> Result<Vec<Label>, AppError> {
        Ok(sqlx::query_as::<_, Label>(&format!(
            "SELECT id, name FROM {} ORDER BY name",
            kind.table()
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_label(&self, kind: LabelKind, name: String) -> Result<Label, AppError> {
        let label = sqlx::query_as::<_, Label>(&format!(
            "INSERT INTO {} (id, name) VALUES ($1, $2) RETURNING id, name",
            kind.table()
        ))
        .bind(Uuid::new_v4())
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        info!("Created {} '{label}' ({})", kind.noun(), label.id);
        Ok(label)
    }

    async fn rename_label(
        &self,
        kind: LabelKind,
        id: Uuid,
        name: String,
    ) -> Result<Label, AppError> {
        sqlx::query_as::<_, Label>(&format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name",
            kind.table()
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(kind.noun(), id))
    }

    async fn delete_label(&self, kind: LabelKind, id: Uuid) -> Result<(), AppError> {
        // Skills and link rows go with it via ON DELETE CASCADE.
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(kind.noun(), id));
        }
        info!("Deleted {} {id}", kind.noun());
        Ok(())
    }

    // ── Skills ─────────────────────────────────────────────────────────────

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        Ok(
            sqlx::query_as::<_, Skill>("SELECT id, name, category_id FROM skills ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn create_skill(&self, input: SkillInput) -> Result<Skill, AppError> {
        let skill = sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (id, name, category_id) VALUES ($1, $2, $3) \
             RETURNING id, name, category_id",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Created skill '{skill}' in category {}", skill.category_id);
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, input: SkillInput) -> Result<Skill, AppError> {
        sqlx::query_as::<_, Skill>(
            "UPDATE skills SET name = $2, category_id = $3 WHERE id = $1 \
             RETURNING id, name, category_id",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Skill", id))
    }

    async fn delete_skill(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Skill", id));
        }
        Ok(())
    }

    // ── Experiences ────────────────────────────────────────────────────────

    async fn list_experiences(&self) -> Result<Vec<Experience>, AppError> {
        let experiences = sqlx::query_as::<_, Experience>(
            "SELECT id, title, company, period, description FROM experiences",
        )
        .fetch_all(&self.pool)
        .await?;
        self.attach_experience_links(experiences).await
    }

    async fn get_experience(&self, id: Uuid) -> Result<Experience, AppError> {
        let experience = sqlx::query_as::<_, Experience>(
            "SELECT id, title, company, period, description FROM experiences WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Experience", id))?;

        let mut loaded = self.attach_experience_links(vec![experience]).await?;
        loaded.pop().ok_or_else(|| not_found("Experience", id))
    }

    async fn create_experience(&self, input: ExperienceInput) -> Result<Experience, AppError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO experiences (id, title, company, period, description) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.company)
        .bind(&input.period)
        .bind(&input.description)
        .execute(&mut *tx)
        .await?;
        replace_links(&mut tx, &EXPERIENCE_TECHNOLOGIES, id, &input.technology_ids).await?;
        tx.commit().await?;

        let experience = self.get_experience(id).await?;
        info!("Created experience '{experience}' ({id})");
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        input: ExperienceInput,
    ) -> Result<Experience, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE experiences SET title = $2, company = $3, period = $4, description = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.company)
        .bind(&input.period)
        .bind(&input.description)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Experience", id));
        }
        replace_links(&mut tx, &EXPERIENCE_TECHNOLOGIES, id, &input.technology_ids).await?;
        tx.commit().await?;

        self.get_experience(id).await
    }

    async fn delete_experience(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Experience", id));
        }
        Ok(())
    }

    // ── Projects ───────────────────────────────────────────────────────────

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects =
            sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        self.attach_project_links(projects).await
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Project", id))?;

        let mut loaded = self.attach_project_links(vec![project]).await?;
        loaded.pop().ok_or_else(|| not_found("Project", id))
    }

    async fn create_project(&self, input: ProjectInput) -> Result<Project, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO projects
                (id, title, description, image, github_link, live_link, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image)
        .bind(&input.github_link)
        .bind(&input.live_link)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        replace_links(&mut tx, &PROJECT_TECHNOLOGIES, id, &input.technology_ids).await?;
        replace_links(&mut tx, &PROJECT_TAGS, id, &input.tag_ids).await?;
        tx.commit().await?;

        let project = self.get_project(id).await?;
        info!("Created project '{project}' ({id})");
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, input: ProjectInput) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = $2, description = $3, image = $4,
                github_link = $5, live_link = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image)
        .bind(&input.github_link)
        .bind(&input.live_link)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Project", id));
        }
        replace_links(&mut tx, &PROJECT_TECHNOLOGIES, id, &input.technology_ids).await?;
        replace_links(&mut tx, &PROJECT_TAGS, id, &input.tag_ids).await?;
        tx.commit().await?;

        self.get_project(id).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Project", id));
        }
        Ok(())
    }

    // ── Contacts ───────────────────────────────────────────────────────────

    async fn create_contact(&self, form: ContactForm) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, name, email, subject, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&form.name)
        .bind(&form.email)
        .bind(&form.subject)
        .bind(&form.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Recorded contact '{contact}' ({})", contact.id);
        Ok(contact)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, AppError> {
        Ok(
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    // ── Certifications ─────────────────────────────────────────────────────

    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        Ok(sqlx::query_as::<_, Certification>(
            "SELECT * FROM certifications ORDER BY issue_date DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_certification(&self, id: Uuid) -> Result<Certification, AppError> {
        sqlx::query_as::<_, Certification>("SELECT * FROM certifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Certification", id))
    }

    async fn create_certification(
        &self,
        input: CertificationInput,
    ) -> Result<Certification, AppError> {
        let cert = input.into_certification(Uuid::new_v4());
        sqlx::query(
            r#"
            INSERT INTO certifications
                (id, title, provider, issue_date, image, skills, certificate_url, verify_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(cert.id)
        .bind(&cert.title)
        .bind(&cert.provider)
        .bind(cert.issue_date)
        .bind(&cert.image)
        .bind(&cert.skills)
        .bind(&cert.certificate_url)
        .bind(&cert.verify_url)
        .execute(&self.pool)
        .await?;

        info!("Created certification '{cert}' ({})", cert.id);
        Ok(cert)
    }

    async fn update_certification(
        &self,
        id: Uuid,
        input: CertificationInput,
    ) -> Result<Certification, AppError> {
        let cert = input.into_certification(id);
        let result = sqlx::query(
            r#"
            UPDATE certifications SET
                title = $2, provider = $3, issue_date = $4, image = $5,
                skills = $6, certificate_url = $7, verify_url = $8
            WHERE id = $1
            "#,
        )
        .bind(cert.id)
        .bind(&cert.title)
        .bind(&cert.provider)
        .bind(cert.issue_date)
        .bind(&cert.image)
        .bind(&cert.skills)
        .bind(&cert.certificate_url)
        .bind(&cert.verify_url)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Certification", id));
        }
        Ok(cert)
    }

    async fn delete_certification(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM certifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("Certification", id));
        }
        Ok(())
    }
}
