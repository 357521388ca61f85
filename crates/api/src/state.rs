use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: expense_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Receipt image storage under the media root.
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(pool: expense_db::DbPool, config: ServerConfig) -> Self {
        let media = MediaStore::new(config.media_root.clone(), config.media_url.clone());
        Self {
            pool,
            config: Arc::new(config),
            media: Arc::new(media),
        }
    }
}
