use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{trimmed, Technology};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    /// Free text such as "2021 - Present"; never parsed.
    pub period: String,
    pub description: String,
    #[sqlx(skip)]
    pub technologies: Vec<Technology>,
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.title, self.company)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExperienceInput {
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub company: String,
    #[validate(length(min = 1, max = 100, message = "Required, at most 100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub period: String,
    #[validate(length(min = 1, message = "This field is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub description: String,
    #[serde(default)]
    pub technology_ids: Vec<Uuid>,
}
