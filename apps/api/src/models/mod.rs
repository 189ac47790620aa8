// Content Store data model: one record type per entity plus a validated input type
// for writes. Relations are resolved by the store, inputs carry related ids only.

pub mod certification;
pub mod contact;
pub mod experience;
pub mod label;
pub mod project;
pub mod skill;
pub mod user;

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::errors::AppError;
use crate::media::UploadDir;

pub use certification::{Certification, CertificationInput};
pub use contact::{Contact, ContactForm};
pub use experience::{Experience, ExperienceInput};
pub use label::{Label, LabelInput, LabelKind, SkillCategory, Tag, Technology};
pub use project::{Project, ProjectInput};
pub use skill::{Skill, SkillInput};
pub use user::{User, UserInput};

/// Deserializes an optional string, treating blank or whitespace-only values as absent.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Deserializes a required string with surrounding whitespace removed, so a
/// whitespace-only value fails `length(min = 1)` like a missing one.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Rejects an object key that was not uploaded into `dir`.
pub(crate) fn check_media_key(field: &str, dir: UploadDir, key: &str) -> Result<(), AppError> {
    if dir.holds(key) {
        Ok(())
    } else {
        Err(AppError::invalid(
            field,
            format!("Expected a file uploaded to '{}/'", dir.prefix()),
        ))
    }
}

/// Drops repeated ids, keeping the first occurrence.
pub(crate) fn unique_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
