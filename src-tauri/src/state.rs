use std::sync::Arc;

use resolver::http_client::HttpRemoteResolver;
use resolver::Resolver;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::credentials::ConfigCredentials;
use crate::database::Database;

#[derive(Clone)]
pub struct State {
    pub db: Arc<Database>,
    pub config: Arc<RwLock<Config>>,
    pub resolver: Resolver,
}

impl State {
    /// Opens the history database and wires the resolver to its collaborators.
    pub async fn new(config: Config) -> Result<Self, String> {
        let db = Arc::new(Database::new());
        db.open(&config.database).await?;

        let remote = HttpRemoteResolver::new(config.remote_config()).map_err(|e| e.to_string())?;
        let config = Arc::new(RwLock::new(config));
        let resolver = Resolver::new(
            Arc::new(remote),
            Arc::new(ConfigCredentials::new(config.clone())),
            db.clone(),
        );

        Ok(Self {
            db,
            config,
            resolver,
        })
    }
}
