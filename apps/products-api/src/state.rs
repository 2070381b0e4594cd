//! Handles shared by every route, built once at startup

use mongodb::{Client, Database};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Kept for shutdown; routes go through `db`
    pub mongo_client: Client,
    pub db: Database,
}

impl AppState {
    /// Bind `mongo_client` to the configured database.
    pub fn new(config: Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(config.mongodb.database());
        Self {
            config,
            mongo_client,
            db,
        }
    }
}
