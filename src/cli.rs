//! Command-line arguments.
//!
//! Every flag is optional and, when given, overrides the matching key from
//! the layered configuration in [`crate::config::Settings`].

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Archive article-search results for every day in a date range.
///
/// ```sh
/// article-archiver --config archiver.yaml --begin 2019-12-01 --end 2020-01-12
/// article-archiver --begin 20200101 --end 20200103 --no-store -o january.json
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// First day to archive (YYYY-MM-DD or YYYYMMDD)
    #[arg(long, value_parser = parse_date)]
    pub begin: Option<NaiveDate>,

    /// Last day to archive, inclusive (YYYY-MM-DD or YYYYMMDD)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Search term
    #[arg(short, long)]
    pub query: Option<String>,

    /// Article search API key
    #[arg(long, env = "NYT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Skip days already recorded as completed in the checkpoint file
    #[arg(long)]
    pub resume: bool,

    /// Fetch and write output without inserting into MongoDB
    #[arg(long)]
    pub no_store: bool,

    /// Where to write the article map
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn apply(
        &self,
        mut builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if let Some(begin) = self.begin {
            builder = builder.set_override("range.begin", begin.to_string())?;
        }
        if let Some(end) = self.end {
            builder = builder.set_override("range.end", end.to_string())?;
        }
        if let Some(query) = &self.query {
            builder = builder.set_override("search.query", query.as_str())?;
        }
        if let Some(api_key) = &self.api_key {
            builder = builder.set_override("search.api_key", api_key.as_str())?;
        }
        if self.resume {
            builder = builder
                .set_override("checkpoint.enabled", true)?
                .set_override("checkpoint.resume", true)?;
        }
        if self.no_store {
            builder = builder.set_override("database.enabled", false)?;
        }
        if let Some(output) = &self.output {
            builder = builder
                .set_override("output.enabled", true)?
                .set_override("output.path", output.to_string_lossy().into_owned())?;
        }

        Ok(builder)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|_| format!("`{s}` is not a date, expected YYYY-MM-DD or YYYYMMDD"))
}
