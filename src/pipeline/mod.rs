//! Selection core and the run pipeline.
//!
//! - `rotation`: index-rotation strategy
//! - `dedup`: dedup-set strategy
//! - `debounce`: same-day guard
//! - `post`: `run_poster`, one scheduled run end to end

pub mod debounce;
pub mod dedup;
pub mod post;
pub mod rotation;
mod select;

pub use debounce::{should_skip, today_utc};
pub use post::{PublishOutcome, RunOptions, RunReport, run_poster};
pub use select::{Selection, ignores_progress, select};
