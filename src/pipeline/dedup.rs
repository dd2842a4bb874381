//! Dedup-set selection.
//!
//! Identity, not position, is the durable key: the first catalog item whose
//! id is not yet in `published` is chosen, so insertions, deletions and
//! reordering upstream never cause a repeat within a cycle.
//!
//! When every catalog id has been published the set is cleared and the
//! first catalog item is chosen and re-marked in the same call. The new
//! cycle therefore already contains the wrap item.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::{CatalogItem, CursorState};
use crate::pipeline::Selection;

/// Select one item and return it with the updated state.
pub fn select_one(
    catalog: &[CatalogItem],
    state: &CursorState,
) -> Result<(CatalogItem, CursorState)> {
    let first = catalog.first().ok_or(AppError::EmptyCatalog)?;

    let mut next = state.clone();
    prune_missing(catalog, &mut next);

    let chosen = match catalog.iter().find(|item| !next.published.contains(&item.id)) {
        Some(item) => item,
        None => {
            log::info!(
                "All {} items published, starting a new cycle",
                catalog.len()
            );
            next.published.clear();
            first
        }
    };

    next.published.insert(chosen.id.clone());
    Ok((chosen.clone(), next))
}

/// Select `batch_size` items by applying [`select_one`] repeatedly.
pub fn select(catalog: &[CatalogItem], state: &CursorState, batch_size: usize) -> Result<Selection> {
    let mut next = state.clone();
    let mut chosen = Vec::with_capacity(batch_size.max(1));

    for _ in 0..batch_size.max(1) {
        let (item, updated) = select_one(catalog, &next)?;
        chosen.push(item);
        next = updated;
    }

    Ok(Selection {
        chosen,
        state: next,
    })
}

/// Drop ids that are no longer in the catalog, keeping `|published| <= N`.
fn prune_missing(catalog: &[CatalogItem], state: &mut CursorState) {
    let present: HashSet<&str> = catalog.iter().map(|item| item.id.as_str()).collect();
    let before = state.published.len();
    state.published.retain(|id| present.contains(id.as_str()));

    let dropped = before - state.published.len();
    if dropped > 0 {
        log::debug!("Pruned {dropped} published ids no longer in the catalog");
    }
}
