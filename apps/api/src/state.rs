use std::sync::Arc;

use crate::config::Config;
use crate::media::MediaStorage;
use crate::store::ContentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Content Store. Default: PgContentStore.
    pub store: Arc<dyn ContentStore>,
    /// Bytes behind the file-valued fields. Default: S3MediaStorage.
    pub media: Arc<dyn MediaStorage>,
    pub config: Config,
}
