// src/models/mod.rs

//! Domain models for the poster application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod item;
mod state;

// Re-export all public types
pub use config::{
    Config, DriveConfig, FacebookConfig, HttpConfig, LoggingConfig, SelectionConfig, StateConfig,
    Strategy, env,
};
pub use item::{CatalogItem, CatalogOrder, sort_catalog};
pub use state::{CursorState, INITIAL_CURSOR};
