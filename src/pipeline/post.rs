// src/pipeline/post.rs

//! Posting pipeline.
//!
//! One run: load state, check the debounce guard, list the catalog, select,
//! commit the new state, then publish. The commit happens before any publish
//! call, and a failed publish never rolls it back: the item counts as
//! consumed and the next run moves on.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{CatalogItem, Config};
use crate::pipeline::{Selection, ignores_progress, select, should_skip};
use crate::services::{CatalogSource, Publisher};
use crate::storage::{Recovery, StateLoad, StateStore};

/// Per-invocation switches.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Calendar day used for the debounce guard
    pub today: NaiveDate,
    /// Select and report only; no commit, no publish
    pub dry_run: bool,
    /// Ignore the debounce guard
    pub force: bool,
}

/// Result of publishing one selected item.
#[derive(Debug)]
pub struct PublishOutcome {
    pub item: CatalogItem,
    pub result: Result<String>,
}

/// What a run did.
#[derive(Debug)]
pub enum RunReport {
    /// A selection was already committed on this day
    Skipped { day: NaiveDate },
    /// Dry run: what would have been published
    Planned { chosen: Vec<CatalogItem> },
    /// State committed and every chosen item attempted
    Posted { outcomes: Vec<PublishOutcome> },
}

impl RunReport {
    /// Number of items whose publish call failed.
    pub fn failures(&self) -> usize {
        match self {
            RunReport::Posted { outcomes } => outcomes.iter().filter(|o| o.result.is_err()).count(),
            _ => 0,
        }
    }
}

/// Run the poster once.
pub async fn run_poster(
    config: &Config,
    source: &dyn CatalogSource,
    publisher: &dyn Publisher,
    store: &dyn StateStore,
    options: RunOptions,
) -> Result<RunReport> {
    let state = match store.load() {
        StateLoad::Loaded(state) => state,
        StateLoad::Recovered {
            state,
            reason: Recovery::Missing,
        } => {
            log::info!("No saved state, starting from the beginning");
            state
        }
        StateLoad::Recovered { state, reason } => {
            log::warn!("{reason}. Starting from the initial state.");
            state
        }
    };

    if ignores_progress(config.selection.strategy, &state) {
        log::warn!(
            "State has cursor {} but no published ids; the dedup strategy starts \
             from the first item. Set selection.strategy = \"rotation\" to continue \
             from the cursor.",
            state.cursor
        );
    }

    if config.selection.debounce && !options.force && should_skip(&state, options.today) {
        log::info!(
            "Already posted on {}, skipping this run",
            options.today
        );
        return Ok(RunReport::Skipped { day: options.today });
    }

    let catalog = source.list_items().await?;
    log::info!(
        "Catalog has {} items (cursor {}, {} published this cycle)",
        catalog.len(),
        state.cursor,
        state.published.len()
    );
    if catalog.is_empty() {
        log::warn!("No videos found in the catalog");
        return Err(AppError::EmptyCatalog);
    }

    let Selection { chosen, mut state } = select(
        config.selection.strategy,
        &catalog,
        &state,
        config.selection.batch_size,
    )?;

    log::info!("Scheduled for posting:");
    for item in &chosen {
        log::info!("  - {}", item.name);
    }

    if options.dry_run {
        log::info!("Dry run, state not committed");
        return Ok(RunReport::Planned { chosen });
    }

    state.mark_committed(options.today);
    store.save(&state)?;
    log::debug!(
        "State committed (cursor {}, {} published)",
        state.cursor,
        state.published.len()
    );

    let mut outcomes = Vec::with_capacity(chosen.len());
    for item in chosen {
        let item_ref = source.item_ref(&item);
        let result = publisher.publish(&item_ref, &config.facebook.caption).await;

        match &result {
            Ok(id) => log::info!("Posted '{}' -> Facebook ID {}", item.name, id),
            Err(e) => log::error!("Failed to post '{}': {}", item.name, e),
        }
        outcomes.push(PublishOutcome { item, result });
    }

    Ok(RunReport::Posted { outcomes })
}
