//! Catalog item data structure and ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the catalog is ordered before selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrder {
    /// Creation time ascending, falling back to the name number
    /// when any item lacks a creation time.
    #[default]
    CreatedTime,
    /// Numeric token of the name only.
    NameNumber,
}

/// A publishable item listed by the catalog source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    /// Opaque upstream identifier (the identity of the item)
    pub id: String,

    /// Display name, usually the file name
    pub name: String,

    /// Upstream creation time
    #[serde(default, rename = "createdTime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Numeric token of the name: all ASCII digits concatenated.
    ///
    /// Names without digits, or with more digits than fit, yield `0`.
    pub fn name_number(&self) -> u128 {
        let digits: String = self.name.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }

    fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name_number()
            .cmp(&other.name_number())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort a catalog in place according to `order`.
///
/// Creation-time ordering only applies when every item carries a
/// timestamp; a partially dated catalog is ordered by name number so
/// that the comparison stays total.
pub fn sort_catalog(items: &mut [CatalogItem], order: CatalogOrder) {
    let all_dated = items.iter().all(|item| item.created_at.is_some());

    match order {
        CatalogOrder::CreatedTime if all_dated => items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.cmp_by_name(b))
        }),
        _ => items.sort_by(CatalogItem::cmp_by_name),
    }
}
