use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::media::UploadDir;

use super::{blank_as_none, check_media_key, trimmed};

/// Listed by most recent `issue_date` first everywhere certifications are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Certification {
    pub id: Uuid,
    pub title: String,
    pub provider: String,
    pub issue_date: NaiveDate,
    /// Object key under `certifications/`.
    pub image: String,
    /// Comma-separated, e.g. "Python, SQL, Docker".
    pub skills: String,
    pub certificate_url: Option<String>,
    pub verify_url: Option<String>,
}

impl Certification {
    /// Splits `skills` on commas and trims each token.
    ///
    /// Order is preserved and nothing is dropped or deduplicated, so an empty
    /// segment in the source (`"a,,b"`) yields an empty token.
    pub fn skills_list(&self) -> Vec<String> {
        split_skills(&self.skills)
    }
}

pub fn split_skills(skills: &str) -> Vec<String> {
    skills.split(',').map(|s| s.trim().to_string()).collect()
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.provider)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CertificationInput {
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    #[serde(deserialize_with = "trimmed")]
    pub provider: String,
    pub issue_date: NaiveDate,
    #[validate(length(min = 1, max = 255, message = "Upload a certificate image"))]
    #[serde(deserialize_with = "trimmed")]
    pub image: String,
    #[validate(length(min = 1, max = 500, message = "Enter skills separated by commas"))]
    #[serde(deserialize_with = "trimmed")]
    pub skills: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        url(message = "Enter a valid URL"),
        length(max = 200, message = "Ensure this value has at most 200 characters")
    )]
    pub certificate_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        url(message = "Enter a valid URL"),
        length(max = 200, message = "Ensure this value has at most 200 characters")
    )]
    pub verify_url: Option<String>,
}

impl CertificationInput {
    pub fn check_media_keys(&self) -> Result<(), AppError> {
        check_media_key("image", UploadDir::Certifications, &self.image)
    }

    pub fn into_certification(self, id: Uuid) -> Certification {
        Certification {
            id,
            title: self.title,
            provider: self.provider,
            issue_date: self.issue_date,
            image: self.image,
            skills: self.skills,
            certificate_url: self.certificate_url,
            verify_url: self.verify_url,
        }
    }
}
