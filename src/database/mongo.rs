use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client as MongoClient, Collection, Database};

use super::ArticleStore;
use crate::config::DatabaseConfig;
use crate::dates::DateKey;
use crate::error::{Error, Result};
use crate::types::PersistedArticle;

/// One collection per day inside a single database handle shared for the run.
pub struct MongoArticleStore {
    db: Database,
    insert_timeout: Duration,
}

impl MongoArticleStore {
    /// Parses the URI and pings the server, all within the connect timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let timeout = config.connect_timeout();

        let db = tokio::time::timeout(timeout, async {
            let options = ClientOptions::parse(&config.uri).await?;
            let client = MongoClient::with_options(options)?;
            let db = client.database(&config.name);
            db.run_command(doc! { "ping": 1 }).await?;
            Ok::<_, mongodb::error::Error>(db)
        })
        .await
        .map_err(|_| Error::Timeout {
            operation: "mongodb connect",
            timeout,
        })??;

        tracing::info!(database = %config.name, "connected to mongodb");

        Ok(Self::new(db, config.insert_timeout()))
    }

    pub fn new(db: Database, insert_timeout: Duration) -> Self {
        Self { db, insert_timeout }
    }

    pub fn collection(&self, date: &DateKey) -> Collection<PersistedArticle> {
        self.db.collection(date.as_str())
    }
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    #[tracing::instrument(skip(self, date, article), fields(date = %date, url = %article.url))]
    async fn insert(&self, date: &DateKey, article: &PersistedArticle) -> Result<()> {
        let collection = self.collection(date);

        let result = tokio::time::timeout(self.insert_timeout, async {
            collection.insert_one(article).await
        })
        .await
        .map_err(|_| Error::Timeout {
            operation: "insert",
            timeout: self.insert_timeout,
        })??;

        tracing::debug!(id = %result.inserted_id, "inserted article");

        Ok(())
    }
}
