//! Media storage for file-valued fields (profile image, resume, project and
//! certification images). Entities store the object key; bytes live behind
//! `MediaStorage`, carried in `AppState` as `Arc<dyn MediaStorage>`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

#[cfg(test)]
pub mod memory;
pub mod s3;

#[cfg(test)]
pub use memory::MemoryMediaStorage;
pub use s3::S3MediaStorage;

/// Conventional upload directory for each file-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDir {
    ProfileImages,
    Resumes,
    Projects,
    Certifications,
}

impl UploadDir {
    pub fn prefix(&self) -> &'static str {
        match self {
            UploadDir::ProfileImages => "profile_images",
            UploadDir::Resumes => "resumes",
            UploadDir::Projects => "projects",
            UploadDir::Certifications => "certifications",
        }
    }

    /// True when `key` names a single file directly under this directory.
    pub fn holds(&self, key: &str) -> bool {
        key.strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|name| !name.is_empty() && !name.contains('/') && name != "..")
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        [
            UploadDir::ProfileImages,
            UploadDir::Resumes,
            UploadDir::Projects,
            UploadDir::Certifications,
        ]
        .into_iter()
        .find(|dir| dir.prefix() == prefix)
    }
}

/// A stored object as returned to callers.
#[derive(Debug, Clone)]
pub struct MediaObject {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredMedia {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError>;

    /// `Ok(None)` when no object exists under `key`.
    async fn get(&self, key: &str) -> Result<Option<MediaObject>, AppError>;
}

/// Builds a collision-free key such as `resumes/<uuid>-jane-doe.pdf`.
pub fn object_key(dir: UploadDir, file_name: &str) -> String {
    format!("{}/{}-{}", dir.prefix(), Uuid::new_v4(), sanitize_file_name(file_name))
}

/// Keeps the last path segment and replaces anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '-',
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '-').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// The file name part of an object key, without the uuid prefix.
pub fn display_file_name(key: &str) -> &str {
    let name = key.rsplit('/').next().unwrap_or(key);
    // `<uuid>-` is 37 chars
    match name.get(36..37) {
        Some("-") if Uuid::parse_str(&name[..36]).is_ok() => &name[37..],
        _ => name,
    }
}

pub fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
