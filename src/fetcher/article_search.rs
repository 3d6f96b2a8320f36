use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::ArticleSource;
use crate::config::SearchConfig;
use crate::dates::DateKey;
use crate::error::{Error, Result};
use crate::types::{Envelope, SearchResponse};

/// Results per page returned by the search endpoint.
const PAGE_SIZE: u64 = 10;
/// The endpoint rejects page indexes above this.
const LAST_PAGE_INDEX: u64 = 100;

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    begin_date: &'a str,
    end_date: &'a str,
    #[serde(rename = "api-key")]
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

pub struct ArticleSearchClient {
    http: reqwest::Client,
    endpoint: String,
    query: String,
    api_key: String,
    max_pages: u32,
    request_interval: Duration,
}

impl fmt::Debug for ArticleSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleSearchClient")
            .field("http", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .field("api_key", &"<redacted>")
            .field("max_pages", &self.max_pages)
            .field("request_interval", &self.request_interval)
            .finish()
    }
}

impl ArticleSearchClient {
    pub fn new(http: reqwest::Client, config: &SearchConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            query: config.query.clone(),
            api_key: config.api_key.clone(),
            max_pages: config.max_pages,
            request_interval: config.request_interval(),
        }
    }

    fn request(&self, date: &DateKey, page: u32) -> reqwest::RequestBuilder {
        self.http.get(&self.endpoint).query(&SearchQuery {
            q: &self.query,
            begin_date: date.as_str(),
            end_date: date.as_str(),
            api_key: &self.api_key,
            page: (page > 0).then_some(page),
        })
    }

    #[tracing::instrument(skip(self, date), fields(date = %date))]
    async fn fetch_page(&self, date: &DateKey, page: u32) -> Result<SearchResponse> {
        let response = self.request(date, page).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "search request rejected");
            return Err(Error::Status { status });
        }

        let body = response.text().await?;
        Ok(decode(&body)?.response)
    }
}

#[async_trait]
impl ArticleSource for ArticleSearchClient {
    #[tracing::instrument(skip(self, date), fields(date = %date))]
    async fn fetch_day(&self, date: &DateKey) -> Result<SearchResponse> {
        let mut response = self.fetch_page(date, 0).await?;
        let pages = pages_to_fetch(response.meta.hits, self.max_pages);

        for page in 1..pages {
            if !self.request_interval.is_zero() {
                tokio::time::sleep(self.request_interval).await;
            }

            let next = self.fetch_page(date, page).await?;
            if next.docs.is_empty() {
                break;
            }
            response.docs.extend(next.docs);
        }

        let fetched = response.docs.len() as u64;
        if fetched < response.meta.hits {
            tracing::warn!(
                hits = response.meta.hits,
                fetched,
                max_pages = self.max_pages,
                "day has more results than were fetched"
            );
        }

        tracing::info!(count = fetched, hits = response.meta.hits, pages, "fetched articles");

        Ok(response)
    }
}

pub fn decode(body: &str) -> Result<Envelope> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "failed to parse search response");
        Error::Decode(e)
    })
}

/// Number of pages worth requesting for a day with `hits` results.
///
/// Always at least one, so an empty day is still confirmed empty.
pub fn pages_to_fetch(hits: u64, max_pages: u32) -> u32 {
    let available = hits.div_ceil(PAGE_SIZE).clamp(1, LAST_PAGE_INDEX + 1);
    available.min(u64::from(max_pages.max(1))) as u32
}
