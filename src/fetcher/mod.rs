use async_trait::async_trait;

use crate::dates::DateKey;
use crate::error::Result;
use crate::types::SearchResponse;

pub mod article_search;

pub use article_search::ArticleSearchClient;

/// Something that can return the articles published on one day.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_day(&self, date: &DateKey) -> Result<SearchResponse>;
}
