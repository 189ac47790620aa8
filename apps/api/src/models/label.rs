use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Entities that carry nothing but a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    SkillCategory,
    Technology,
    Tag,
}

impl LabelKind {
    pub fn table(&self) -> &'static str {
        match self {
            LabelKind::SkillCategory => "skill_categories",
            LabelKind::Technology => "technologies",
            LabelKind::Tag => "tags",
        }
    }

    pub fn max_name_chars(&self) -> usize {
        match self {
            LabelKind::SkillCategory => 100,
            LabelKind::Technology | LabelKind::Tag => 50,
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            LabelKind::SkillCategory => "Skill category",
            LabelKind::Technology => "Technology",
            LabelKind::Tag => "Tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Label {
    pub id: Uuid,
    pub name: String,
}

/// Owns a collection of skills; deleting one deletes its skills.
pub type SkillCategory = Label;
pub type Technology = Label;
pub type Tag = Label;

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelInput {
    #[serde(default)]
    pub name: String,
}

impl LabelInput {
    /// Returns the trimmed name, or a validation error if it is empty or too long for `kind`.
    pub fn validated_name(&self, kind: LabelKind) -> Result<String, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid("name", "This field is required"));
        }
        let max = kind.max_name_chars();
        if name.chars().count() > max {
            return Err(AppError::invalid(
                "name",
                format!("Ensure this value has at most {max} characters"),
            ));
        }
        Ok(name.to_string())
    }
}
