//! Strategy dispatch.

use crate::error::Result;
use crate::models::{CatalogItem, CursorState, Strategy};
use crate::pipeline::{dedup, rotation};

/// Items chosen for this run and the state to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub chosen: Vec<CatalogItem>,
    pub state: CursorState,
}

/// Select the next batch using the configured strategy.
pub fn select(
    strategy: Strategy,
    catalog: &[CatalogItem],
    state: &CursorState,
    batch_size: usize,
) -> Result<Selection> {
    match strategy {
        Strategy::Rotation => rotation::select(catalog, state, batch_size),
        Strategy::Dedup => dedup::select(catalog, state, batch_size),
    }
}

/// True when `state` carries rotation progress that `strategy` will not use.
///
/// This happens when a file written by the rotation strategy, or a legacy
/// `last_index` file, is read under the dedup strategy: dedup starts from
/// an empty published set and so begins again at the first item.
pub fn ignores_progress(strategy: Strategy, state: &CursorState) -> bool {
    strategy == Strategy::Dedup && state.published.is_empty() && state.cursor >= 0
}
