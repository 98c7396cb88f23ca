use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use log::info;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

/// Process-wide MongoDB handle. Built once at startup and passed to the
/// repositories that need it; `shutdown` is called on exit.
#[derive(Clone, Debug)]
pub struct Db {
    client: Client,
    db: Database,
}

impl Db {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let client_options = ClientOptions::parse(&config.url).await.context("MongoDB URI parse error")?;
        let client = Client::with_options(client_options).context("MongoDB client init error")?;
        let db = client.database(&config.db_name);
        info!("mongodb handle ready for database {}", config.db_name);
        Ok(Self { client, db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("mongodb client shut down");
    }
}
