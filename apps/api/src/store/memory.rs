use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{not_found, ContentStore};
use crate::errors::AppError;
use crate::models::{
    unique_ids, Certification, CertificationInput, Contact, ContactForm, Experience,
    ExperienceInput, Label, LabelKind, Project, ProjectInput, Skill, SkillInput, User, UserInput,
};

struct StoredExperience {
    experience: Experience,
    technology_ids: Vec<Uuid>,
}

struct StoredProject {
    project: Project,
    technology_ids: Vec<Uuid>,
    tag_ids: Vec<Uuid>,
}

#[derive(Default)]
struct Tables {
    profile: Option<User>,
    skill_categories: Vec<Label>,
    technologies: Vec<Label>,
    tags: Vec<Label>,
    skills: Vec<Skill>,
    experiences: Vec<StoredExperience>,
    projects: Vec<StoredProject>,
    contacts: Vec<Contact>,
    certifications: Vec<Certification>,
}

impl Tables {
    fn labels(&self, kind: LabelKind) -> &Vec<Label> {
        match kind {
            LabelKind::SkillCategory => &self.skill_categories,
            LabelKind::Technology => &self.technologies,
            LabelKind::Tag => &self.tags,
        }
    }

    fn labels_mut(&mut self, kind: LabelKind) -> &mut Vec<Label> {
        match kind {
            LabelKind::SkillCategory => &mut self.skill_categories,
            LabelKind::Technology => &mut self.technologies,
            LabelKind::Tag => &mut self.tags,
        }
    }

    /// Mirrors a foreign key check: every id must name an existing label.
    fn require_labels(&self, kind: LabelKind, ids: &[Uuid]) -> Result<(), AppError> {
        let labels = self.labels(kind);
        match ids.iter().find(|id| !labels.iter().any(|l| l.id == **id)) {
            Some(missing) => Err(AppError::Integrity(format!(
                "{} {missing} does not exist",
                kind.noun()
            ))),
            None => Ok(()),
        }
    }

    fn resolve(&self, kind: LabelKind, ids: &[Uuid]) -> Vec<Label> {
        let mut resolved: Vec<Label> = self
            .labels(kind)
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect();
        resolved.sort_by(|a, b| a.name.cmp(&b.name));
        resolved
    }

    fn load_experience(&self, stored: &StoredExperience) -> Experience {
        let mut experience = stored.experience.clone();
        experience.technologies = self.resolve(LabelKind::Technology, &stored.technology_ids);
        experience
    }

    fn load_project(&self, stored: &StoredProject) -> Project {
        let mut project = stored.project.clone();
        project.technologies = self.resolve(LabelKind::Technology, &stored.technology_ids);
        project.tags = self.resolve(LabelKind::Tag, &stored.tag_ids);
        project
    }
}

/// In-process Content Store used by handler and contract tests.
#[derive(Default)]
pub struct MemoryContentStore {
    tables: Mutex<Tables>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_profile(&self) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.profile.clone())
    }

    async fn save_profile(&self, input: UserInput) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;
        let id = tables.profile.as_ref().map_or_else(Uuid::new_v4, |p| p.id);
        let user = input.into_user(id);
        tables.profile = Some(user.clone());
        Ok(user)
    }

    async fn delete_profile(&self) -> Result<(), AppError> {
        self.tables
            .lock()
            .await
            .profile
            .take()
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    async fn list_labels(&self, kind: LabelKind) -> Result<Vec<Label>, AppError> {
        let mut labels = self.tables.lock().await.labels(kind).clone();
        labels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(labels)
    }

    async fn create_label(&self, kind: LabelKind, name: String) -> Result<Label, AppError> {
        let label = Label {
            id: Uuid::new_v4(),
            name,
        };
        self.tables
            .lock()
            .await
            .labels_mut(kind)
            .push(label.clone());
        Ok(label)
    }

    async fn rename_label(
        &self,
        kind: LabelKind,
        id: Uuid,
        name: String,
    ) -> Result<Label, AppError> {
        let mut tables = self.tables.lock().await;
        let label = tables
            .labels_mut(kind)
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found(kind.noun(), id))?;
        label.name = name;
        Ok(label.clone())
    }

    async fn delete_label(&self, kind: LabelKind, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let labels = tables.labels_mut(kind);
        let before = labels.len();
        labels.retain(|l| l.id != id);
        if labels.len() == before {
            return Err(not_found(kind.noun(), id));
        }

        match kind {
            LabelKind::SkillCategory => tables.skills.retain(|s| s.category_id != id),
            LabelKind::Technology => {
                for stored in &mut tables.experiences {
                    stored.technology_ids.retain(|t| *t != id);
                }
                for stored in &mut tables.projects {
                    stored.technology_ids.retain(|t| *t != id);
                }
            }
            LabelKind::Tag => {
                for stored in &mut tables.projects {
                    stored.tag_ids.retain(|t| *t != id);
                }
            }
        }
        Ok(())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let mut skills = self.tables.lock().await.skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn create_skill(&self, input: SkillInput) -> Result<Skill, AppError> {
        let mut tables = self.tables.lock().await;
        tables.require_labels(LabelKind::SkillCategory, &[input.category_id])?;
        let skill = Skill {
            id: Uuid::new_v4(),
            name: input.name,
            category_id: input.category_id,
        };
        tables.skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, input: SkillInput) -> Result<Skill, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.skills.iter().any(|s| s.id == id) {
            return Err(not_found("Skill", id));
        }
        tables.require_labels(LabelKind::SkillCategory, &[input.category_id])?;
        let skill = tables
            .skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Skill", id))?;
        skill.name = input.name;
        skill.category_id = input.category_id;
        Ok(skill.clone())
    }

    async fn delete_skill(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let before = tables.skills.len();
        tables.skills.retain(|s| s.id != id);
        if tables.skills.len() == before {
            return Err(not_found("Skill", id));
        }
        Ok(())
    }

    async fn list_experiences(&self) -> Result<Vec<Experience>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .experiences
            .iter()
            .map(|stored| tables.load_experience(stored))
            .collect())
    }

    async fn get_experience(&self, id: Uuid) -> Result<Experience, AppError> {
        let tables = self.tables.lock().await;
        tables
            .experiences
            .iter()
            .find(|stored| stored.experience.id == id)
            .map(|stored| tables.load_experience(stored))
            .ok_or_else(|| not_found("Experience", id))
    }

    async fn create_experience(&self, input: ExperienceInput) -> Result<Experience, AppError> {
        let mut tables = self.tables.lock().await;
        tables.require_labels(LabelKind::Technology, &input.technology_ids)?;
        let stored = StoredExperience {
            experience: Experience {
                id: Uuid::new_v4(),
                title: input.title,
                company: input.company,
                period: input.period,
                description: input.description,
                technologies: Vec::new(),
            },
            technology_ids: unique_ids(&input.technology_ids),
        };
        let experience = tables.load_experience(&stored);
        tables.experiences.push(stored);
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        input: ExperienceInput,
    ) -> Result<Experience, AppError> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .experiences
            .iter()
            .position(|stored| stored.experience.id == id)
            .ok_or_else(|| not_found("Experience", id))?;
        tables.require_labels(LabelKind::Technology, &input.technology_ids)?;

        let stored = &mut tables.experiences[index];
        stored.experience.title = input.title;
        stored.experience.company = input.company;
        stored.experience.period = input.period;
        stored.experience.description = input.description;
        stored.technology_ids = unique_ids(&input.technology_ids);
        Ok(tables.load_experience(&tables.experiences[index]))
    }

    async fn delete_experience(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let before = tables.experiences.len();
        tables.experiences.retain(|stored| stored.experience.id != id);
        if tables.experiences.len() == before {
            return Err(not_found("Experience", id));
        }
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let tables = self.tables.lock().await;
        // Later inserts win ties on `created_at`.
        let mut projects: Vec<Project> = tables
            .projects
            .iter()
            .rev()
            .map(|stored| tables.load_project(stored))
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, AppError> {
        let tables = self.tables.lock().await;
        tables
            .projects
            .iter()
            .find(|stored| stored.project.id == id)
            .map(|stored| tables.load_project(stored))
            .ok_or_else(|| not_found("Project", id))
    }

    async fn create_project(&self, input: ProjectInput) -> Result<Project, AppError> {
        let mut tables = self.tables.lock().await;
        tables.require_labels(LabelKind::Technology, &input.technology_ids)?;
        tables.require_labels(LabelKind::Tag, &input.tag_ids)?;
        let now = Utc::now();
        let stored = StoredProject {
            project: Project {
                id: Uuid::new_v4(),
                title: input.title,
                description: input.description,
                image: input.image,
                github_link: input.github_link,
                live_link: input.live_link,
                created_at: now,
                updated_at: now,
                technologies: Vec::new(),
                tags: Vec::new(),
            },
            technology_ids: unique_ids(&input.technology_ids),
            tag_ids: unique_ids(&input.tag_ids),
        };
        let project = tables.load_project(&stored);
        tables.projects.push(stored);
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, input: ProjectInput) -> Result<Project, AppError> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .projects
            .iter()
            .position(|stored| stored.project.id == id)
            .ok_or_else(|| not_found("Project", id))?;
        tables.require_labels(LabelKind::Technology, &input.technology_ids)?;
        tables.require_labels(LabelKind::Tag, &input.tag_ids)?;

        let stored = &mut tables.projects[index];
        stored.project.title = input.title;
        stored.project.description = input.description;
        stored.project.image = input.image;
        stored.project.github_link = input.github_link;
        stored.project.live_link = input.live_link;
        stored.project.updated_at = Utc::now();
        stored.technology_ids = unique_ids(&input.technology_ids);
        stored.tag_ids = unique_ids(&input.tag_ids);
        Ok(tables.load_project(&tables.projects[index]))
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let before = tables.projects.len();
        tables.projects.retain(|stored| stored.project.id != id);
        if tables.projects.len() == before {
            return Err(not_found("Project", id));
        }
        Ok(())
    }

    async fn create_contact(&self, form: ContactForm) -> Result<Contact, AppError> {
        let contact = Contact {
            id: Uuid::new_v4(),
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            created_at: Utc::now(),
        };
        self.tables.lock().await.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, AppError> {
        let mut contacts: Vec<Contact> = self
            .tables
            .lock()
            .await
            .contacts
            .iter()
            .rev()
            .cloned()
            .collect();
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contacts)
    }

    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        let mut certifications = self.tables.lock().await.certifications.clone();
        certifications.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(certifications)
    }

    async fn get_certification(&self, id: Uuid) -> Result<Certification, AppError> {
        self.tables
            .lock()
            .await
            .certifications
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found("Certification", id))
    }

    async fn create_certification(
        &self,
        input: CertificationInput,
    ) -> Result<Certification, AppError> {
        let cert = input.into_certification(Uuid::new_v4());
        self.tables.lock().await.certifications.push(cert.clone());
        Ok(cert)
    }

    async fn update_certification(
        &self,
        id: Uuid,
        input: CertificationInput,
    ) -> Result<Certification, AppError> {
        let mut tables = self.tables.lock().await;
        let cert = tables
            .certifications
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Certification", id))?;
        *cert = input.into_certification(id);
        Ok(cert.clone())
    }

    async fn delete_certification(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let before = tables.certifications.len();
        tables.certifications.retain(|c| c.id != id);
        if tables.certifications.len() == before {
            return Err(not_found("Certification", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project_input(title: &str) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            description: format!("About {title}"),
            image: format!("projects/{title}.png"),
            github_link: None,
            live_link: None,
            technology_ids: vec![],
            tag_ids: vec![],
        }
    }

    fn certification_input(title: &str, issued: (i32, u32, u32)) -> CertificationInput {
        CertificationInput {
            title: title.to_string(),
            provider: "Provider".to_string(),
            issue_date: NaiveDate::from_ymd_opt(issued.0, issued.1, issued.2).unwrap(),
            image: format!("certifications/{title}.png"),
            skills: "Python, SQL".to_string(),
            certificate_url: None,
            verify_url: None,
        }
    }

    #[tokio::test]
    async fn test_projects_listed_newest_first() {
        let store = MemoryContentStore::new();
        let a = store.create_project(project_input("a")).await.unwrap();
        let b = store.create_project(project_input("b")).await.unwrap();

        let listed = store.list_projects().await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_project_update_refreshes_updated_at_only() {
        let store = MemoryContentStore::new();
        let created = store.create_project(project_input("a")).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = store
            .update_project(created.id, project_input("renamed"))
            .await
            .unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.title, "renamed");
    }

    #[tokio::test]
    async fn test_certifications_listed_by_issue_date_desc() {
        let store = MemoryContentStore::new();
        store
            .create_certification(certification_input("older", (2024, 1, 1)))
            .await
            .unwrap();
        store
            .create_certification(certification_input("newer", (2024, 6, 1)))
            .await
            .unwrap();

        let titles: Vec<String> = store
            .list_certifications()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_deleting_category_cascades_to_its_skills() {
        let store = MemoryContentStore::new();
        let backend = store
            .create_label(LabelKind::SkillCategory, "Backend".to_string())
            .await
            .unwrap();
        let frontend = store
            .create_label(LabelKind::SkillCategory, "Frontend".to_string())
            .await
            .unwrap();
        for (name, category) in [("Rust", &backend), ("SQL", &backend), ("CSS", &frontend)] {
            store
                .create_skill(SkillInput {
                    name: name.to_string(),
                    category_id: category.id,
                })
                .await
                .unwrap();
        }

        store
            .delete_label(LabelKind::SkillCategory, backend.id)
            .await
            .unwrap();

        let remaining: Vec<String> = store
            .list_skills()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(remaining, vec!["CSS"]);
    }

    #[tokio::test]
    async fn test_deleting_empty_category_has_no_side_effects() {
        let store = MemoryContentStore::new();
        let empty = store
            .create_label(LabelKind::SkillCategory, "Empty".to_string())
            .await
            .unwrap();
        let other = store
            .create_label(LabelKind::SkillCategory, "Other".to_string())
            .await
            .unwrap();
        store
            .create_skill(SkillInput {
                name: "Go".to_string(),
                category_id: other.id,
            })
            .await
            .unwrap();

        store
            .delete_label(LabelKind::SkillCategory, empty.id)
            .await
            .unwrap();

        assert_eq!(store.list_skills().await.unwrap().len(), 1);
        assert_eq!(
            store.list_labels(LabelKind::SkillCategory).await.unwrap(),
            vec![other]
        );
    }

    #[tokio::test]
    async fn test_skill_with_unknown_category_is_integrity_error() {
        let store = MemoryContentStore::new();
        let err = store
            .create_skill(SkillInput {
                name: "Orphan".to_string(),
                category_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
        assert!(store.list_skills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_technology_unlinks_but_keeps_owners() {
        let store = MemoryContentStore::new();
        let rust = store
            .create_label(LabelKind::Technology, "Rust".to_string())
            .await
            .unwrap();
        let mut input = project_input("engine");
        input.technology_ids = vec![rust.id, rust.id];
        let project = store.create_project(input).await.unwrap();
        assert_eq!(project.technologies, vec![rust.clone()]);

        store
            .delete_label(LabelKind::Technology, rust.id)
            .await
            .unwrap();

        let reloaded = store.get_project(project.id).await.unwrap();
        assert!(reloaded.technologies.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = MemoryContentStore::new();
        let err = store
            .update_certification(Uuid::new_v4(), certification_input("x", (2023, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_profile_is_a_singleton() {
        let store = MemoryContentStore::new();
        let input: UserInput = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "title": "Engineer",
            "email": "ada@example.com",
            "about": "Bio",
            "profile_image": "profile_images/ada.png",
            "github_username": "ada",
            "linkedin_username": "ada"
        }))
        .unwrap();
        let first = store.save_profile(input.clone()).await.unwrap();
        let mut renamed = input;
        renamed.name = "Ada L.".to_string();
        let second = store.save_profile(renamed).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.get_profile().await.unwrap().unwrap().name, "Ada L.");
    }
}
