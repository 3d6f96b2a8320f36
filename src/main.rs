use std::process::ExitCode;

use anyhow::Context as _;
use article_archiver::archiver::Archiver;
use article_archiver::checkpoint::Checkpoint;
use article_archiver::cli::Cli;
use article_archiver::config::Settings;
use article_archiver::dates::date_range;
use article_archiver::fetcher::ArticleSearchClient;
use article_archiver::global::Global;
use article_archiver::output::{write_article_map, write_run_report};
use clap::Parser;
use time::format_description::well_known::Rfc3339;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let builder = cli.apply(Settings::builder(cli.config.as_deref()))?;
    let settings = Settings::from_builder(builder).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_file(true)
        .with_line_number(true)
        .with_timer(UtcTime::new(Rfc3339))
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy(&settings.level),
        )
        .init();

    tracing::info!(
        begin = %settings.range.begin,
        end = %settings.range.end,
        query = %settings.search.query,
        "starting article archiver"
    );

    let dates = date_range(settings.range.begin, settings.range.end)?;
    let global = Global::init(settings).await?;
    let settings = &global.settings;

    tracing::info!("all services initialized");

    let mut checkpoint = match settings.checkpoint.enabled {
        true => Some(
            Checkpoint::load(&settings.checkpoint.path)
                .await
                .context("loading checkpoint")?,
        ),
        false => None,
    };

    let dates = match &checkpoint {
        Some(checkpoint) if settings.checkpoint.resume => {
            let pending = checkpoint.pending(dates);
            tracing::info!(pending = pending.len(), "resuming from checkpoint");
            pending
        }
        _ => dates,
    };

    let source = ArticleSearchClient::new(global.http_client.clone(), &settings.search);
    let mut archiver =
        Archiver::new(&source).with_request_interval(settings.search.request_interval());
    if let Some(store) = &global.store {
        archiver = archiver.with_store(store);
    }
    if let Some(checkpoint) = checkpoint.as_mut() {
        if global.store.is_none() {
            tracing::warn!(
                path = %checkpoint.path().display(),
                "no database configured, checkpoint will not record any days"
            );
        }
        archiver = archiver.with_checkpoint(checkpoint);
    }

    let summary = archiver.run(&dates).await;
    summary.log();

    if settings.output.enabled {
        write_article_map(&summary.articles, &settings.output.path)
            .await
            .context("writing output")?;

        if let Some(path) = &settings.output.report_path {
            write_run_report(&summary, path)
                .await
                .context("writing run report")?;
        }
    }

    tracing::info!(elapsed = ?global.started_at.elapsed(), "shutting down");

    Ok(match summary.has_failures() {
        true => ExitCode::FAILURE,
        false => ExitCode::SUCCESS,
    })
}
