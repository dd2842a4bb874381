//! Service layer for the poster application.
//!
//! This module contains the collaborators around the selection core:
//! - Catalog listing (`DriveCatalog`)
//! - Video publishing (`GraphPublisher`)

mod drive;
mod facebook;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CatalogItem;

pub use drive::DriveCatalog;
pub use facebook::GraphPublisher;

/// Source of publishable items.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List the current items, already in selection order.
    async fn list_items(&self) -> Result<Vec<CatalogItem>>;

    /// Reference the publisher can fetch the item from.
    fn item_ref(&self, item: &CatalogItem) -> String;
}

/// Destination that publishes one item per call.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the item and return the id assigned upstream.
    async fn publish(&self, item_ref: &str, caption: &str) -> Result<String>;
}
