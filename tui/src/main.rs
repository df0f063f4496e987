//! WikiTok terminal client
//!
//! Random Wikipedia articles, one per screen, loading more as you scroll.

mod app;
mod terminal;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wikitok_core::adapters::{
    CommandLauncher, CommandLine, CommandShareTarget, HttpImageLoader, Osc52Clipboard,
    WikipediaClientImpl,
};
use wikitok_core::app::{CardService, FeedService, Platform};
use wikitok_core::config::Config;
use wikitok_core::domain::ports::ShareTarget;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    // The terminal belongs to the UI, so logs go to a file
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wikitok=debug,wikitok_core=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    tracing::info!(
        "Starting WikiTok for {} ({} articles per batch)",
        config.wiki_host,
        config.batch_size
    );

    let wikipedia =
        Arc::new(WikipediaClientImpl::new(&config).context("Failed to create Wikipedia client")?);
    let images = Arc::new(HttpImageLoader::new(&config).context("Failed to create image loader")?);

    let share = config
        .share_command
        .as_deref()
        .and_then(CommandLine::parse)
        .map(|command| Arc::new(CommandShareTarget::new(command)) as Arc<dyn ShareTarget>);
    if share.is_none() {
        tracing::debug!("No share command configured, sharing copies links to the clipboard");
    }
    let platform = Platform {
        share,
        clipboard: Arc::new(Osc52Clipboard::stdout()),
        launcher: Arc::new(CommandLauncher::from_browser(config.browser.as_deref())),
    };

    let feed = Arc::new(FeedService::new(
        Arc::clone(&wikipedia),
        Arc::clone(&images),
        config.batch_size,
    ));
    let cards = Arc::new(CardService::new(
        wikipedia,
        images,
        platform,
        config.wiki_host.clone(),
    ));

    let result = app::run(feed, cards, config.prefetch_screens).await;
    match &result {
        Ok(()) => tracing::info!("WikiTok stopped"),
        Err(e) => tracing::error!("WikiTok stopped with an error: {:#}", e),
    }
    result
}
