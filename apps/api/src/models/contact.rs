use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::trimmed;

/// A contact form submission. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.subject)
    }
}

/// Fields posted by the public contact form. Values are trimmed; missing fields
/// deserialize as empty so they surface as validation errors rather than
/// extractor rejections.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Required, at most 100 characters"))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 254, message = "Ensure this value has at most 254 characters")
    )]
    pub email: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters"))]
    pub subject: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "This field is required"))]
    pub message: String,
}
