use crate::config::Config;
use crate::videos::storage::VideoStorage;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub storage: VideoStorage,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let storage = VideoStorage::new(config.videos_root.clone());
        Self {
            db,
            config,
            storage,
        }
    }
}
