//! Crawler module for fetching pages and following their links
//!
//! This module contains the core crawling logic, including:
//! - The [`Corpus`] fetch interface with live HTTP and on-disk cache backends
//! - The [`Frontier`] queue interface with an in-memory backend
//! - Link extraction from fetched pages
//! - The [`Controller`] that drives the crawl loop

mod cache_corpus;
mod controller;
mod corpus;
mod extractor;
mod frontier;
mod http_corpus;

pub use cache_corpus::{cache_file_name, CacheCorpus};
pub use controller::{Controller, CrawlState, Offer};
pub use corpus::{charset_from_content_type, Corpus, FetchResult};
pub use extractor::{
    decode_content, discover_links, extract_next_links, page_text, parse_refresh_target,
    ExtractError, Extraction, LinkKind, PageLink,
};
pub use frontier::{Frontier, MemoryFrontier};
pub use http_corpus::{build_http_client, user_agent_string, HttpCorpus, MAX_REDIRECTS};

use crate::analytics::AnalyticsReport;
use crate::config::{Config, CorpusMode, OutputConfig};
use crate::filter::TrapFilter;
use crate::storage::{SqliteFrontier, StorageResult};
use crate::{ConfigError, WeirError};
use std::path::Path;
use std::sync::atomic::Ordering;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the frontier (persistent when `frontier-path` is set)
/// 2. Build the corpus for the configured mode
/// 3. Seed the frontier and run the controller until it is done
/// 4. Return the analytics report of the run
///
/// Ctrl-C stops the crawl after the page in progress; the report then
/// covers the partial run.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Discard any persisted frontier before starting
pub async fn crawl(config: &Config, fresh: bool) -> Result<AnalyticsReport, WeirError> {
    let frontier = open_frontier(&config.output, fresh)?;
    let filter = TrapFilter::new(config.crawler.target_domain.as_str(), config.filter.clone());

    match config.corpus.mode {
        CorpusMode::Http => {
            let corpus = HttpCorpus::new(&config.user_agent, &config.corpus)?;
            run_controller(Controller::new(corpus, frontier, filter), config).await
        }
        CorpusMode::Cache => {
            let dir = config.corpus.cache_dir.as_deref().ok_or_else(|| {
                ConfigError::Validation("cache mode requires cache-dir".to_string())
            })?;
            let corpus = CacheCorpus::new(dir);
            run_controller(Controller::new(corpus, frontier, filter), config).await
        }
    }
}

async fn run_controller<C: Corpus>(
    controller: Controller<C>,
    config: &Config,
) -> Result<AnalyticsReport, WeirError> {
    let mut controller = controller.with_max_pages(config.crawler.max_pages);

    let added = controller.seed(&config.crawler.seeds)?;
    tracing::info!(
        "Seeded frontier with {} new URLs ({} queued)",
        added,
        controller.frontier().len()?
    );

    let shutdown = controller.shutdown_handle();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let result = controller.run().await;
    signal_task.abort();
    result?;

    Ok(controller.report())
}

/// Opens the configured frontier
///
/// With `fresh`, a persisted frontier is cleared first; otherwise it resumes
/// with whatever URLs it still holds.
pub fn open_frontier(output: &OutputConfig, fresh: bool) -> StorageResult<Box<dyn Frontier + Send>> {
    let Some(path) = &output.frontier_path else {
        return Ok(Box::new(MemoryFrontier::new()));
    };

    let mut frontier = SqliteFrontier::new(Path::new(path))?;

    if fresh {
        tracing::info!("Clearing frontier at {}", path);
        frontier.clear()?;
    } else if frontier.has_next()? {
        tracing::info!(
            "Resuming frontier at {}: {} fetched, {} queued",
            path,
            frontier.fetched()?,
            frontier.len()?
        );
    }

    Ok(Box::new(frontier))
}
