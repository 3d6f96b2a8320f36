use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::checkpoint::Checkpoint;
use crate::database::ArticleStore;
use crate::dates::DateKey;
use crate::error::Result;
use crate::fetcher::ArticleSource;
use crate::types::PersistedArticle;

/// Articles found per day, in date order. Failed days are absent.
pub type ArticleMap = BTreeMap<DateKey, Vec<PersistedArticle>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DayOutcome {
    Completed {
        fetched: usize,
        stored: usize,
        store_failures: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: DateKey,
    #[serde(flatten)]
    pub outcome: DayOutcome,
}

/// Per-day results of a run, as written next to the output file.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub completed: usize,
    pub failed: usize,
    pub articles: usize,
    pub store_failures: usize,
    pub days: &'a [DayReport],
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub articles: ArticleMap,
    pub days: Vec<DayReport>,
}

impl RunSummary {
    pub fn completed(&self) -> impl Iterator<Item = &DateKey> {
        self.days
            .iter()
            .filter(|d| matches!(d.outcome, DayOutcome::Completed { .. }))
            .map(|d| &d.date)
    }

    pub fn failed(&self) -> impl Iterator<Item = &DayReport> {
        self.days
            .iter()
            .filter(|d| matches!(d.outcome, DayOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    pub fn total_articles(&self) -> usize {
        self.articles.values().map(Vec::len).sum()
    }

    pub fn store_failures(&self) -> usize {
        self.days
            .iter()
            .map(|d| match d.outcome {
                DayOutcome::Completed { store_failures, .. } => store_failures,
                DayOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn report(&self) -> RunReport<'_> {
        RunReport {
            completed: self.completed().count(),
            failed: self.failed().count(),
            articles: self.total_articles(),
            store_failures: self.store_failures(),
            days: &self.days,
        }
    }

    pub fn log(&self) {
        for day in self.failed() {
            if let DayOutcome::Failed { error } = &day.outcome {
                tracing::warn!(date = %day.date, error = %error, "day failed");
            }
        }

        tracing::info!(
            days = self.days.len(),
            completed = self.completed().count(),
            failed = self.failed().count(),
            articles = self.total_articles(),
            store_failures = self.store_failures(),
            "run finished"
        );
    }
}

/// Runs fetch, map and store for each day in turn.
///
/// A day whose fetch fails is recorded and skipped. Store failures are
/// counted per article and never stop the day. Only days whose articles all
/// reached the store are checkpointed.
pub struct Archiver<'a> {
    source: &'a dyn ArticleSource,
    store: Option<&'a dyn ArticleStore>,
    checkpoint: Option<&'a mut Checkpoint>,
    request_interval: Duration,
}

impl<'a> Archiver<'a> {
    pub fn new(source: &'a dyn ArticleSource) -> Self {
        Self {
            source,
            store: None,
            checkpoint: None,
            request_interval: Duration::ZERO,
        }
    }

    pub fn with_store(mut self, store: &'a dyn ArticleStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_checkpoint(mut self, checkpoint: &'a mut Checkpoint) -> Self {
        self.checkpoint = Some(checkpoint);
        self
    }

    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    #[tracing::instrument(name = "Archiver", skip_all, fields(days = dates.len()))]
    pub async fn run(&mut self, dates: &[DateKey]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (i, date) in dates.iter().enumerate() {
            if i > 0 && !self.request_interval.is_zero() {
                tokio::time::sleep(self.request_interval).await;
            }

            let outcome = match self.archive_day(date).await {
                Ok((articles, outcome)) => {
                    summary.articles.insert(date.clone(), articles);
                    outcome
                }
                Err(e) => {
                    tracing::error!(date = %date, error = %e, "fetch failed, continuing with next day");
                    DayOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };

            if self.store.is_some()
                && matches!(outcome, DayOutcome::Completed { store_failures: 0, .. })
            {
                self.record_completed(date).await;
            }

            summary.days.push(DayReport {
                date: date.clone(),
                outcome,
            });
        }

        summary
    }

    #[tracing::instrument(skip(self, date), fields(date = %date))]
    async fn archive_day(&self, date: &DateKey) -> Result<(Vec<PersistedArticle>, DayOutcome)> {
        let response = self.source.fetch_day(date).await?;

        let articles: Vec<PersistedArticle> = response
            .docs
            .into_iter()
            .map(PersistedArticle::from)
            .collect();

        let mut stored = 0;
        let mut store_failures = 0;

        if let Some(store) = self.store {
            for article in &articles {
                match store.insert(date, article).await {
                    Ok(()) => stored += 1,
                    Err(e) => {
                        store_failures += 1;
                        tracing::warn!(url = %article.url, error = %e, "failed to store article");
                    }
                }
            }
        }

        tracing::info!(count = articles.len(), stored, store_failures, "day archived");

        let outcome = DayOutcome::Completed {
            fetched: articles.len(),
            stored,
            store_failures,
        };

        Ok((articles, outcome))
    }

    async fn record_completed(&mut self, date: &DateKey) {
        let Some(checkpoint) = self.checkpoint.as_deref_mut() else {
            return;
        };

        if let Err(e) = checkpoint.mark_completed(date).await {
            tracing::warn!(date = %date, error = %e, "failed to update checkpoint");
        }
    }
}
