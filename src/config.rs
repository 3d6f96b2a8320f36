use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.nytimes.com/svc/search/v2/articlesearch.json";

#[derive(Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub request_interval_ms: u64,
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("query", &self.query)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_pages", &self.max_pages)
            .field("request_interval_ms", &self.request_interval_ms)
            .finish()
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeConfig {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_database_uri")]
    pub uri: String,
    #[serde(default = "default_database_name")]
    pub name: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_insert_timeout")]
    pub insert_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn insert_timeout(&self) -> Duration {
        Duration::from_secs(self.insert_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            uri: default_database_uri(),
            name: default_database_name(),
            connect_timeout_secs: default_connect_timeout(),
            insert_timeout_secs: default_insert_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Per-day run report; `null` disables it.
    #[serde(default = "default_report_path")]
    pub report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_output_path(),
            report_path: default_report_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_checkpoint_path")]
    pub path: PathBuf,
    /// Skip days the checkpoint already lists as completed.
    #[serde(default)]
    pub resume: bool,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_checkpoint_path(),
            resume: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_level")]
    pub level: String,
    pub search: SearchConfig,
    pub range: RangeConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
}

impl Settings {
    /// Layered sources: `config/default.yaml`, then `path` if given, then
    /// `ARCHIVER__*` environment variables.
    pub fn builder(path: Option<&str>) -> ConfigBuilder<DefaultState> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default.yaml").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder.add_source(Environment::with_prefix("ARCHIVER").separator("__"))
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.api_key.trim().is_empty() {
            return Err(ConfigError::Message("search.api_key must not be empty".into()));
        }

        if self.search.max_pages == 0 {
            return Err(ConfigError::Message("search.max_pages must be at least 1".into()));
        }

        if self.range.begin > self.range.end {
            return Err(ConfigError::Message(format!(
                "range.begin ({}) is after range.end ({})",
                self.range.begin, self.range.end
            )));
        }

        Ok(())
    }
}

fn default_level() -> String {
    "info".into()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_query() -> String {
    "coronavirus".into()
}

fn default_search_timeout() -> u64 {
    30
}

fn default_max_pages() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_database_uri() -> String {
    "mongodb://localhost:27017".into()
}

fn default_database_name() -> String {
    "articles".into()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_insert_timeout() -> u64 {
    5
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.json")
}

fn default_report_path() -> Option<PathBuf> {
    Some(PathBuf::from("report.json"))
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("checkpoint.json")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn load_file(file: &tempfile::NamedTempFile) -> Result<Settings, ConfigError> {
        let builder = Config::builder().add_source(File::from(file.path()));
        Settings::from_builder(builder)
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let file = write_config(
            "search:\n  api_key: test-key\nrange:\n  begin: 2019-12-01\n  end: 2020-01-12\n",
        );

        let settings = load_file(&file).unwrap();

        assert_eq!(settings.level, "info");
        assert_eq!(settings.search.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.search.query, "coronavirus");
        assert_eq!(settings.search.max_pages, 1);
        assert_eq!(settings.search.timeout(), Duration::from_secs(30));
        assert_eq!(settings.range.begin, NaiveDate::from_ymd_opt(2019, 12, 1).unwrap());
        assert_eq!(settings.range.end, NaiveDate::from_ymd_opt(2020, 1, 12).unwrap());
        assert!(settings.database.enabled);
        assert_eq!(settings.database.name, "articles");
        assert_eq!(settings.database.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.database.insert_timeout(), Duration::from_secs(5));
        assert_eq!(settings.output.path, PathBuf::from("output.json"));
        assert_eq!(settings.output.report_path, Some(PathBuf::from("report.json")));
        assert!(!settings.checkpoint.enabled);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let file = write_config(concat!(
            "level: debug\n",
            "search:\n  api_key: k\n  query: election\n  max_pages: 3\n  request_interval_ms: 6000\n",
            "range:\n  begin: 2020-01-01\n  end: 2020-01-01\n",
            "database:\n  enabled: false\n  uri: mongodb://db:27017\n",
            "output:\n  path: out/articles.json\n  report_path: null\n",
            "checkpoint:\n  enabled: true\n  resume: true\n",
        ));

        let settings = load_file(&file).unwrap();

        assert_eq!(settings.level, "debug");
        assert_eq!(settings.search.query, "election");
        assert_eq!(settings.search.max_pages, 3);
        assert_eq!(settings.search.request_interval(), Duration::from_secs(6));
        assert!(!settings.database.enabled);
        assert_eq!(settings.database.uri, "mongodb://db:27017");
        assert_eq!(settings.database.name, "articles");
        assert_eq!(settings.output.path, PathBuf::from("out/articles.json"));
        assert_eq!(settings.output.report_path, None);
        assert!(settings.checkpoint.enabled);
        assert!(settings.checkpoint.resume);
    }

    #[test]
    fn layered_builder_reads_explicit_file() {
        let file = write_config(
            "search:\n  api_key: from-file\n  query: election\nrange:\n  begin: 2020-01-01\n  end: 2020-01-02\n",
        );
        let path = file.path().to_str().unwrap();

        let settings = Settings::from_builder(Settings::builder(Some(path))).unwrap();

        assert_eq!(settings.search.api_key, "from-file");
        assert_eq!(settings.search.query, "election");
        assert_eq!(settings.range.end, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let file = write_config(
            "search:\n  api_key: SECRET-KEY\nrange:\n  begin: 2020-01-01\n  end: 2020-01-01\n",
        );

        let rendered = format!("{:?}", load_file(&file).unwrap());

        assert!(!rendered.contains("SECRET-KEY"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let file = write_config(
            "search:\n  api_key: k\nrange:\n  begin: 2020-01-03\n  end: 2020-01-01\n",
        );
        assert!(load_file(&file).is_err());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let file = write_config(
            "search:\n  api_key: \"\"\nrange:\n  begin: 2020-01-01\n  end: 2020-01-01\n",
        );
        assert!(load_file(&file).is_err());
    }

    #[test]
    fn zero_pages_is_rejected() {
        let file = write_config(
            "search:\n  api_key: k\n  max_pages: 0\nrange:\n  begin: 2020-01-01\n  end: 2020-01-01\n",
        );
        assert!(load_file(&file).is_err());
    }

    #[test]
    fn missing_range_is_an_error() {
        let file = write_config("search:\n  api_key: k\n");
        assert!(load_file(&file).is_err());
    }
}
