use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dates::DateKey;
use crate::error::Result;
use crate::output::{read_json, write_json};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CheckpointFile {
    #[serde(default)]
    completed: BTreeSet<DateKey>,
}

/// Days that finished cleanly in earlier runs, persisted after each day.
#[derive(Debug)]
pub struct Checkpoint {
    path: PathBuf,
    state: CheckpointFile,
}

impl Checkpoint {
    /// A missing file means nothing has completed yet.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = match tokio::fs::try_exists(&path).await? {
            true => read_json(&path).await?,
            false => CheckpointFile::default(),
        };

        tracing::debug!(path = %path.display(), completed = state.completed.len(), "loaded checkpoint");

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_completed(&self, date: &DateKey) -> bool {
        self.state.completed.contains(date)
    }

    pub fn completed(&self) -> impl Iterator<Item = &DateKey> {
        self.state.completed.iter()
    }

    /// Drops already-completed days, keeping order.
    pub fn pending(&self, dates: Vec<DateKey>) -> Vec<DateKey> {
        dates.into_iter().filter(|d| !self.is_completed(d)).collect()
    }

    pub async fn mark_completed(&mut self, date: &DateKey) -> Result<()> {
        if self.state.completed.insert(date.clone()) {
            write_json(&self.state, &self.path).await?;
        }
        Ok(())
    }
}
