use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::media::UploadDir;

use super::{blank_as_none, check_media_key, trimmed};

/// The site owner's profile. There is at most one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub email: String,
    pub about: String,
    /// Object key under `profile_images/`.
    pub profile_image: String,
    /// Object key under `resumes/`.
    pub resume: Option<String>,
    pub github_username: String,
    pub github_url: Option<String>,
    pub linkedin_username: String,
    pub linkedin_url: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, max = 100, message = "Required, at most 100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub title: String,
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 254, message = "Ensure this value has at most 254 characters")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub about: String,
    #[validate(length(min = 1, max = 255, message = "Upload a profile image"))]
    #[serde(deserialize_with = "trimmed")]
    pub profile_image: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters"))]
    pub resume: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Required, at most 100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub github_username: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        url(message = "Enter a valid URL"),
        length(max = 200, message = "Ensure this value has at most 200 characters")
    )]
    pub github_url: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Required, at most 100 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub linkedin_username: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        url(message = "Enter a valid URL"),
        length(max = 200, message = "Ensure this value has at most 200 characters")
    )]
    pub linkedin_url: Option<String>,
}

impl UserInput {
    pub fn check_media_keys(&self) -> Result<(), AppError> {
        check_media_key("profile_image", UploadDir::ProfileImages, &self.profile_image)?;
        if let Some(resume) = &self.resume {
            check_media_key("resume", UploadDir::Resumes, resume)?;
        }
        Ok(())
    }

    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            name: self.name,
            title: self.title,
            email: self.email,
            about: self.about,
            profile_image: self.profile_image,
            resume: self.resume,
            github_username: self.github_username,
            github_url: self.github_url,
            linkedin_username: self.linkedin_username,
            linkedin_url: self.linkedin_url,
        }
    }
}
