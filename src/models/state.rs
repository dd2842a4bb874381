//! Persisted cursor state.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cursor value before anything has been published.
pub const INITIAL_CURSOR: i64 = -1;

/// Durable record of what has been published.
///
/// Both selection strategies share this one schema: rotation reads and
/// writes `cursor`, dedup reads and writes `published`. The field the
/// active strategy does not use is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CursorState {
    /// Catalog position of the last published item (`-1` before the first run)
    pub cursor: i64,

    /// Ids published since the last full-cycle reset
    pub published: BTreeSet<String>,

    /// UTC day of the last committed selection
    pub last_run_day: Option<NaiveDate>,

    /// Time of the last commit
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            cursor: INITIAL_CURSOR,
            published: BTreeSet::new(),
            last_run_day: None,
            updated_at: None,
        }
    }
}

impl CursorState {
    /// Stamp the state as committed on `today`.
    pub fn mark_committed(&mut self, today: NaiveDate) {
        self.last_run_day = Some(today);
        self.updated_at = Some(Utc::now());
    }
}

/// Lenient on-disk shape. Every key is optional and unknown keys are ignored.
///
/// Only reached through a JSON object; the derived deserializer alone would
/// also accept a positional array.
#[derive(Deserialize)]
struct StateRecord {
    #[serde(default)]
    cursor: Option<i64>,

    /// Older files stored the next start position instead of the last
    /// published one.
    #[serde(default)]
    last_index: Option<i64>,

    #[serde(default)]
    published: BTreeSet<String>,

    #[serde(default)]
    last_run_day: Option<NaiveDate>,

    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<StateRecord> for CursorState {
    fn from(record: StateRecord) -> Self {
        let cursor = record
            .cursor
            .or_else(|| {
                record
                    .last_index
                    .map(|next| next.checked_sub(1).unwrap_or(INITIAL_CURSOR))
            })
            .unwrap_or(INITIAL_CURSOR);

        Self {
            cursor,
            published: record.published,
            last_run_day: record.last_run_day,
            updated_at: record.updated_at,
        }
    }
}

impl TryFrom<Map<String, Value>> for CursorState {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let record: StateRecord = serde_json::from_value(Value::Object(map))?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default() {
        let state: CursorState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, CursorState::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let json = r#"{"cursor": 4, "published": ["a", "b"], "owner": "ops"}"#;
        let state: CursorState = serde_json::from_str(json).unwrap();
        assert_eq!(state.cursor, 4);
        assert_eq!(state.published.len(), 2);
    }

    #[test]
    fn test_legacy_last_index() {
        let state: CursorState = serde_json::from_str(r#"{"last_index": 6}"#).unwrap();
        assert_eq!(state.cursor, 5);

        let state: CursorState = serde_json::from_str(r#"{"last_index": 0}"#).unwrap();
        assert_eq!(state.cursor, INITIAL_CURSOR);
    }

    #[test]
    fn test_legacy_last_index_at_minimum() {
        let json = format!(r#"{{"last_index": {}}}"#, i64::MIN);
        let state: CursorState = serde_json::from_str(&json).unwrap();
        assert_eq!(state.cursor, INITIAL_CURSOR);
    }

    #[test]
    fn test_cursor_wins_over_last_index() {
        let state: CursorState =
            serde_json::from_str(r#"{"cursor": 2, "last_index": 9}"#).unwrap();
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn test_serialized_keys() {
        let mut state = CursorState::default();
        state.mark_committed(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["cursor"], -1);
        assert_eq!(value["published"], serde_json::json!([]));
        assert_eq!(value["last_run_day"], "2026-10-19");
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(serde_json::from_str::<CursorState>(r#"{"cursor": "three"}"#).is_err());
        assert!(serde_json::from_str::<CursorState>("[1, 2]").is_err());
        assert!(serde_json::from_str::<CursorState>("42").is_err());
        assert!(serde_json::from_str::<CursorState>("null").is_err());
    }
}
