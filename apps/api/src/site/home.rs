use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Certification, Experience, LabelKind, Project, Skill, SkillCategory, User};
use crate::store::ContentStore;

#[derive(Debug, Serialize)]
pub struct SkillCategoryView {
    #[serde(flatten)]
    pub category: SkillCategory,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct CertificationView {
    #[serde(flatten)]
    pub certification: Certification,
    pub skills_list: Vec<String>,
}

impl From<Certification> for CertificationView {
    fn from(certification: Certification) -> Self {
        let skills_list = certification.skills_list();
        Self {
            certification,
            skills_list,
        }
    }
}

/// Everything the home page renders, in display order.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub profile: Option<User>,
    pub skill_categories: Vec<SkillCategoryView>,
    pub experiences: Vec<Experience>,
    /// Newest first.
    pub projects: Vec<Project>,
    /// Most recent issue date first.
    pub certifications: Vec<CertificationView>,
}

pub async fn build_home_page(store: &dyn ContentStore) -> Result<HomePage, AppError> {
    let profile = store.get_profile().await?;
    let categories = store.list_labels(LabelKind::SkillCategory).await?;
    let skills = store.list_skills().await?;
    let experiences = store.list_experiences().await?;
    let projects = store.list_projects().await?;
    let certifications = store.list_certifications().await?;

    Ok(HomePage {
        profile,
        skill_categories: group_skills(categories, skills),
        experiences,
        projects,
        certifications: certifications.into_iter().map(Into::into).collect(),
    })
}

/// Pairs each category with its skills, keeping the order of both inputs.
pub fn group_skills(categories: Vec<SkillCategory>, skills: Vec<Skill>) -> Vec<SkillCategoryView> {
    categories
        .into_iter()
        .map(|category| {
            let skills = skills
                .iter()
                .filter(|s| s.category_id == category.id)
                .cloned()
                .collect();
            SkillCategoryView { category, skills }
        })
        .collect()
}
