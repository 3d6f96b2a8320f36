use anyhow::Context as _;

use crate::config::Settings;
use crate::database::MongoArticleStore;

/// Handles built once at startup and lent to the run.
pub struct Global {
    pub settings: Settings,
    pub http_client: reqwest::Client,
    pub store: Option<MongoArticleStore>,
    pub started_at: std::time::Instant,
}

impl Global {
    pub async fn init(settings: Settings) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.search.timeout())
            .build()
            .context("http client")?;

        let store = if settings.database.enabled {
            let store = MongoArticleStore::connect(&settings.database)
                .await
                .context("mongodb connect")?;
            Some(store)
        } else {
            tracing::info!("database disabled, articles will not be stored");
            None
        };

        Ok(Self {
            settings,
            http_client,
            store,
            started_at: std::time::Instant::now(),
        })
    }
}
