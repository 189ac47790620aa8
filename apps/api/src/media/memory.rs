use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use super::{MediaObject, MediaStorage};
use crate::errors::AppError;

/// In-process media storage used by handler tests.
#[derive(Default)]
pub struct MemoryMediaStorage {
    objects: Mutex<HashMap<String, MediaObject>>,
}

impl MemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects.lock().await.insert(
            key.to_string(),
            MediaObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<MediaObject>, AppError> {
        Ok(self.objects.lock().await.get(key).cloned())
    }
}
