use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::media::UploadDir;

use super::{blank_as_none, check_media_key, trimmed, Tag, Technology};

/// Listed newest first (`created_at DESC`) everywhere projects are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Object key under `projects/`.
    pub image: String,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub technologies: Vec<Technology>,
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "Upload a project image"))]
    #[serde(deserialize_with = "trimmed")]
    pub image: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        url(message = "Enter a valid URL"),
        length(max = 200, message = "Ensure this value has at most 200 characters")
    )]
    pub github_link: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        url(message = "Enter a valid URL"),
        length(max = 200, message = "Ensure this value has at most 200 characters")
    )]
    pub live_link: Option<String>,
    #[serde(default)]
    pub technology_ids: Vec<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl ProjectInput {
    pub fn check_media_keys(&self) -> Result<(), AppError> {
        check_media_key("image", UploadDir::Projects, &self.image)
    }
}
