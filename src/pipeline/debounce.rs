//! Same-day debounce guard.
//!
//! Sits in front of either selection strategy. When the guard is disabled,
//! every invocation advances the cursor, so several runs on one day post
//! several batches.

use chrono::{NaiveDate, Utc};

use crate::models::CursorState;

/// True if a selection was already committed on `today`.
pub fn should_skip(state: &CursorState, today: NaiveDate) -> bool {
    state.last_run_day == Some(today)
}

/// Current calendar day in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
