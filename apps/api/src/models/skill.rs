use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::trimmed;

/// A skill always belongs to exactly one skill category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SkillInput {
    #[validate(length(min = 1, max = 100, message = "Required, at most 100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    pub category_id: Uuid,
}
