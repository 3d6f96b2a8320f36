use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::archiver::{ArticleMap, RunSummary};
use crate::error::{Error, Result};

/// Pretty JSON indented with tabs.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).map_err(Error::Output)?;
    Ok(buf)
}

pub(crate) async fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = to_pretty_json(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    fs::write(path, json).await?;
    Ok(())
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|source| Error::CorruptFile {
        path: path.to_path_buf(),
        source,
    })
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub async fn write_article_map(articles: &ArticleMap, path: &Path) -> Result<()> {
    write_json(articles, path).await?;

    tracing::info!(
        days = articles.len(),
        articles = articles.values().map(Vec::len).sum::<usize>(),
        "wrote article map"
    );

    Ok(())
}

pub async fn read_article_map(path: &Path) -> Result<ArticleMap> {
    read_json(path).await
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub async fn write_run_report(summary: &RunSummary, path: &Path) -> Result<()> {
    write_json(&summary.report(), path).await?;
    tracing::info!(days = summary.days.len(), "wrote run report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archiver::{DayOutcome, DayReport};
    use crate::dates::DateKey;
    use crate::types::{Keyword, PersistedArticle};

    fn article(n: usize) -> PersistedArticle {
        PersistedArticle {
            abstract_text: format!("abstract {n}"),
            url: format!("https://example.com/{n}"),
            title: format!("title {n}"),
            byline: "By Someone".into(),
            published: "2020-01-01T00:00:00+0000".into(),
            keywords: vec![Keyword {
                name: "subject".into(),
                value: "Coronavirus".into(),
                rank: 1,
                major: "N".into(),
            }],
        }
    }

    fn sample_map() -> ArticleMap {
        let mut map = ArticleMap::new();
        map.insert(DateKey::parse("20200101").unwrap(), vec![article(1), article(2)]);
        map.insert(DateKey::parse("20200102").unwrap(), vec![]);
        map.insert(DateKey::parse("20200103").unwrap(), vec![article(3)]);
        map
    }

    #[tokio::test]
    async fn article_map_survives_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let map = sample_map();

        write_article_map(&map, &path).await.unwrap();
        let read = read_article_map(&path).await.unwrap();

        assert_eq!(read.keys().collect::<Vec<_>>(), map.keys().collect::<Vec<_>>());
        for (date, articles) in &map {
            assert_eq!(read[date].len(), articles.len(), "{date}");
        }
        assert_eq!(read, map);
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("2020").join("output.json");

        write_article_map(&sample_map(), &path).await.unwrap();

        assert!(path.exists());
    }

    #[test]
    fn output_is_tab_indented_object_keyed_by_date() {
        let json = String::from_utf8(to_pretty_json(&sample_map()).unwrap()).unwrap();

        assert!(json.starts_with("{\n\t\"20200101\": [\n\t\t{"));
        assert!(json.contains("\t\"20200102\": []"));
        assert!(json.contains("\"abstract\": \"abstract 1\""));

        let first = json.find("20200101").unwrap();
        let third = json.find("20200103").unwrap();
        assert!(first < third);
    }

    #[tokio::test]
    async fn run_report_lists_every_day() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("report.json");
        let summary = RunSummary {
            articles: sample_map(),
            days: vec![
                DayReport {
                    date: DateKey::parse("20200101").unwrap(),
                    outcome: DayOutcome::Completed {
                        fetched: 2,
                        stored: 2,
                        store_failures: 0,
                    },
                },
                DayReport {
                    date: DateKey::parse("20200104").unwrap(),
                    outcome: DayOutcome::Failed {
                        error: "search api returned 429 Too Many Requests".into(),
                    },
                },
            ],
        };

        write_run_report(&summary, &path).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.starts_with("{\n\t\"completed\": 1,"));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["failed"], 1);
        assert_eq!(value["articles"], 3);
        assert_eq!(value["days"].as_array().unwrap().len(), 2);
        assert_eq!(value["days"][1]["error"], "search api returned 429 Too Many Requests");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_article_map(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn corrupt_output_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        tokio::fs::write(&path, "{\"20200101\": [").await.unwrap();

        let err = read_article_map(&path).await.unwrap_err();

        assert!(matches!(&err, Error::CorruptFile { path: p, .. } if p == &path));
        let message = err.to_string();
        assert!(message.starts_with("corrupt file"), "{message}");
        assert!(message.contains("output.json"), "{message}");
        assert!(!message.contains("malformed response"), "{message}");
    }
}
