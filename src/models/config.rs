//! Application configuration structures.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CatalogOrder;

/// Root application configuration.
///
/// Built once at startup (file, then environment overlay) and passed by
/// reference to everything that needs it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Google Drive folder listing
    #[serde(default)]
    pub drive: DriveConfig,

    /// Facebook Page publishing
    #[serde(default)]
    pub facebook: FacebookConfig,

    /// Selection strategy and schedule
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Cursor state file
    #[serde(default)]
    pub state: StateConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration, treating an absent file as "use defaults".
    ///
    /// Returns `Ok(None)` only when the file does not exist. A file that
    /// exists but cannot be read or parsed is an error, so a typo in the
    /// config never silently changes the strategy or batch size.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(toml::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup. Empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::PAGE_ID) {
            self.facebook.page_id = v;
        }
        if let Some(v) = get(env::PAGE_TOKEN) {
            self.facebook.access_token = v;
        }
        if let Some(v) = get(env::FOLDER_ID) {
            self.drive.folder_id = v;
        }
        if let Some(v) = get(env::DRIVE_TOKEN) {
            self.drive.access_token = Some(v);
        }
        if let Some(v) = get(env::API_KEY) {
            self.drive.api_key = Some(v);
        }
        if let Some(v) = get(env::STATE_FILE) {
            self.state.path = PathBuf::from(v);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.selection.batch_size == 0 {
            return Err(AppError::validation("selection.batch_size must be > 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.facebook.page_id.trim().is_empty() {
            return Err(AppError::validation(format!(
                "facebook.page_id is empty (set {})",
                env::PAGE_ID
            )));
        }
        if self.facebook.access_token.trim().is_empty() {
            return Err(AppError::validation(format!(
                "facebook.access_token is empty (set {})",
                env::PAGE_TOKEN
            )));
        }
        if self.drive.folder_id.trim().is_empty() {
            return Err(AppError::validation(format!(
                "drive.folder_id is empty (set {})",
                env::FOLDER_ID
            )));
        }
        if self.drive.access_token.is_none() && self.drive.api_key.is_none() {
            return Err(AppError::validation(format!(
                "no Drive credentials (set {} or {})",
                env::DRIVE_TOKEN,
                env::API_KEY
            )));
        }
        if self.drive.page_size == 0 {
            return Err(AppError::validation("drive.page_size must be > 0"));
        }
        Ok(())
    }
}

/// Environment variable names.
pub mod env {
    pub const PAGE_ID: &str = "FACEBOOK_PAGE_ID";
    pub const PAGE_TOKEN: &str = "FACEBOOK_PAGE_ACCESS_TOKEN";
    pub const FOLDER_ID: &str = "GOOGLE_DRIVE_FOLDER_ID";
    pub const DRIVE_TOKEN: &str = "GOOGLE_DRIVE_ACCESS_TOKEN";
    pub const API_KEY: &str = "GOOGLE_API_KEY";
    pub const STATE_FILE: &str = "POSTER_STATE_FILE";
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Google Drive folder listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Folder whose direct children are listed
    #[serde(default)]
    pub folder_id: String,

    /// OAuth bearer token
    #[serde(default)]
    pub access_token: Option<String>,

    /// API key, for publicly shared folders
    #[serde(default)]
    pub api_key: Option<String>,

    /// Only files whose MIME type contains this are listed
    #[serde(default = "defaults::mime_prefix")]
    pub mime_prefix: String,

    /// Files requested per listing page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Catalog ordering
    #[serde(default)]
    pub order: CatalogOrder,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            folder_id: String::new(),
            access_token: None,
            api_key: None,
            mime_prefix: defaults::mime_prefix(),
            page_size: defaults::page_size(),
            order: CatalogOrder::default(),
        }
    }
}

/// Facebook Page publishing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    /// Target Page id
    #[serde(default)]
    pub page_id: String,

    /// Page access token
    #[serde(default)]
    pub access_token: String,

    /// Graph API version segment
    #[serde(default = "defaults::api_version")]
    pub api_version: String,

    /// Description attached to every video
    #[serde(default = "defaults::caption")]
    pub caption: String,

    /// Publish immediately instead of creating an unpublished video
    #[serde(default = "defaults::published")]
    pub published: bool,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            page_id: String::new(),
            access_token: String::new(),
            api_version: defaults::api_version(),
            caption: defaults::caption(),
            published: defaults::published(),
        }
    }
}

/// Selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Contiguous wrap-around window after the stored cursor position
    Rotation,
    /// First items whose id has not been published this cycle
    #[default]
    Dedup,
}

/// Selection and schedule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub strategy: Strategy,

    /// Items published per run
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Skip the run if a selection was already committed today (UTC)
    #[serde(default)]
    pub debounce: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            batch_size: defaults::batch_size(),
            debounce: false,
        }
    }
}

/// Cursor state file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "defaults::state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: defaults::state_path(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; reel-poster/0.1)".into()
    }
    pub fn timeout() -> u64 {
        120
    }

    pub fn mime_prefix() -> String {
        "video/".into()
    }
    pub fn page_size() -> u32 {
        1000
    }

    pub fn api_version() -> String {
        "v20.0".into()
    }
    pub fn caption() -> String {
        "Don't forget to subscribe for more!\n\n\
         #movie #movieclips #movienetflix #fyp #viral #facebookvideo\n"
            .into()
    }
    pub fn published() -> bool {
        true
    }

    pub fn batch_size() -> usize {
        2
    }

    pub fn state_path() -> PathBuf {
        PathBuf::from("posted_cache.json")
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn complete() -> Config {
        let mut config = Config::default();
        config.facebook.page_id = "1234".into();
        config.facebook.access_token = "page-token".into();
        config.drive.folder_id = "folder".into();
        config.drive.api_key = Some("key".into());
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.selection.batch_size, 2);
        assert_eq!(config.selection.strategy, Strategy::Dedup);
        assert!(!config.selection.debounce);
        assert_eq!(config.state.path, PathBuf::from("posted_cache.json"));
        assert_eq!(config.http.timeout_secs, 120);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [selection]
            strategy = "rotation"
            debounce = true

            [drive]
            folder_id = "abc"
            order = "name_number"
            "#,
        )
        .unwrap();

        assert_eq!(config.selection.strategy, Strategy::Rotation);
        assert_eq!(config.selection.batch_size, 2);
        assert!(config.selection.debounce);
        assert_eq!(config.drive.folder_id, "abc");
        assert_eq!(config.drive.order, CatalogOrder::NameNumber);
        assert_eq!(config.drive.mime_prefix, "video/");
    }

    #[test]
    fn test_example_file_parses() {
        let config: Config = toml::from_str(include_str!("../../poster.example.toml")).unwrap();
        assert_eq!(config.selection.strategy, Strategy::Dedup);
        assert_eq!(config.drive.order, CatalogOrder::CreatedTime);
        assert!(config.facebook.caption.starts_with("Don't forget"));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let tmp = TempDir::new().unwrap();
        let loaded = Config::load_optional(tmp.path().join("poster.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_optional_rejects_bad_types() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("poster.toml");
        fs::write(&path, "[selection]\nbatch_size = \"3\"\n").unwrap();

        assert!(matches!(
            Config::load_optional(&path),
            Err(AppError::Toml(_))
        ));
    }

    #[test]
    fn test_load_optional_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("poster.toml");
        fs::write(&path, "[selection]\nbatch_size = 3\n").unwrap();

        let config = Config::load_optional(&path).unwrap().unwrap();
        assert_eq!(config.selection.batch_size, 3);
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            (env::PAGE_ID, "99"),
            (env::PAGE_TOKEN, "tok"),
            (env::FOLDER_ID, "fold"),
            (env::API_KEY, "   "),
            (env::STATE_FILE, "/var/lib/poster/state.json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_with(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.facebook.page_id, "99");
        assert_eq!(config.facebook.access_token, "tok");
        assert_eq!(config.drive.folder_id, "fold");
        assert_eq!(config.drive.api_key, None);
        assert_eq!(
            config.state.path,
            PathBuf::from("/var/lib/poster/state.json")
        );
    }

    #[test]
    fn test_validate() {
        assert!(complete().validate().is_ok());

        let mut config = complete();
        config.selection.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = complete();
        config.drive.api_key = None;
        assert!(config.validate().is_err());

        let mut config = complete();
        config.facebook.page_id.clear();
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_err());
    }
}
