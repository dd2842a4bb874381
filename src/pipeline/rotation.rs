//! Index-rotation selection.
//!
//! Picks a contiguous, wrap-around window of the catalog starting right
//! after the stored cursor. The cursor is only meaningful relative to the
//! current catalog length, so any stored value is normalized with a
//! euclidean remainder before use.
//!
//! A batch larger than the catalog repeats items within the batch. This
//! keeps every run making progress without tracking per-item history.

use crate::error::{AppError, Result};
use crate::models::{CatalogItem, CursorState};
use crate::pipeline::Selection;

/// Select `batch_size` items after `state.cursor`.
pub fn select(catalog: &[CatalogItem], state: &CursorState, batch_size: usize) -> Result<Selection> {
    let n = catalog.len();
    if n == 0 {
        return Err(AppError::EmptyCatalog);
    }
    // Zero is rejected by config validation.
    let batch = batch_size.max(1);

    let start = next_start(state.cursor, n);
    let chosen = (0..batch)
        .map(|k| catalog[(start + k % n) % n].clone())
        .collect();

    let mut next = state.clone();
    next.cursor = ((start + (batch - 1) % n) % n) as i64;

    Ok(Selection {
        chosen,
        state: next,
    })
}

/// First index to publish, given the last published position.
fn next_start(cursor: i64, n: usize) -> usize {
    let last = cursor.rem_euclid(n as i64) as usize;
    (last + 1) % n
}
