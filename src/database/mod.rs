use async_trait::async_trait;

use crate::dates::DateKey;
use crate::error::Result;
use crate::types::PersistedArticle;

mod mongo;

pub use mongo::MongoArticleStore;

/// Insert-only sink for mapped articles, partitioned by day.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn insert(&self, date: &DateKey, article: &PersistedArticle) -> Result<()>;
}
