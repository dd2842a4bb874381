// src/services/drive.rs

//! Google Drive folder catalog.
//!
//! Lists the video files directly inside a folder through the Drive v3
//! `files.list` endpoint, following `nextPageToken` until the listing is
//! complete, then orders the result for selection.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CatalogItem, DriveConfig, sort_catalog};
use crate::services::CatalogSource;
use crate::utils::http::api_error_message;

const FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";
const DOWNLOAD_ENDPOINT: &str = "https://drive.google.com/uc";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, createdTime)";

/// One page of a `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<CatalogItem>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Catalog source backed by a Drive folder.
pub struct DriveCatalog {
    client: Client,
    config: DriveConfig,
}

impl DriveCatalog {
    pub fn new(client: Client, config: &DriveConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Drive search query for the configured folder.
    fn query(&self) -> String {
        format!(
            "'{}' in parents and mimeType contains '{}' and trashed=false",
            escape_literal(&self.config.folder_id),
            escape_literal(&self.config.mime_prefix)
        )
    }

    /// Listing URL for one page.
    fn page_url(&self, page_token: Option<&str>) -> Result<Url> {
        let page_size = self.config.page_size.to_string();
        let query = self.query();

        let mut params = vec![
            ("q", query.as_str()),
            ("fields", LIST_FIELDS),
            ("pageSize", page_size.as_str()),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ];
        if let Some(key) = self.config.api_key.as_deref() {
            params.push(("key", key));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        Ok(Url::parse_with_params(FILES_ENDPOINT, &params)?)
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<FileList> {
        let mut request = self.client.get(self.page_url(page_token)?);
        if let Some(token) = self.config.access_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::catalog(status.as_u16(), api_error_message(&body)));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Escape a value for use inside a single-quoted Drive query literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl CatalogSource for DriveCatalog {
    async fn list_items(&self) -> Result<Vec<CatalogItem>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            pages += 1;
            items.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        log::debug!("Listed {} files over {} page(s)", items.len(), pages);

        sort_catalog(&mut items, self.config.order);
        Ok(items)
    }

    fn item_ref(&self, item: &CatalogItem) -> String {
        let params = [("export", "download"), ("id", item.id.as_str())];
        match Url::parse_with_params(DOWNLOAD_ENDPOINT, &params) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{DOWNLOAD_ENDPOINT}?export=download&id={}", item.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(config: DriveConfig) -> DriveCatalog {
        DriveCatalog::new(Client::new(), &config)
    }

    fn config() -> DriveConfig {
        DriveConfig {
            folder_id: "folder123".into(),
            api_key: Some("k3y".into()),
            ..DriveConfig::default()
        }
    }

    #[test]
    fn test_query() {
        assert_eq!(
            catalog(config()).query(),
            "'folder123' in parents and mimeType contains 'video/' and trashed=false"
        );
    }

    #[test]
    fn test_query_escapes_quotes() {
        let drive = catalog(DriveConfig {
            folder_id: "it's".into(),
            ..config()
        });
        assert!(drive.query().starts_with(r"'it\'s' in parents"));
    }

    #[test]
    fn test_page_url() {
        let drive = catalog(config());
        let url = drive.page_url(Some("next-1")).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("www.googleapis.com"));
        assert!(pairs.contains(&("pageSize".into(), "1000".into())));
        assert!(pairs.contains(&("key".into(), "k3y".into())));
        assert!(pairs.contains(&("pageToken".into(), "next-1".into())));
        assert!(pairs.contains(&("fields".into(), LIST_FIELDS.into())));
    }

    #[test]
    fn test_page_url_without_key_or_token() {
        let drive = catalog(DriveConfig {
            api_key: None,
            access_token: Some("tok".into()),
            ..config()
        });
        let url = drive.page_url(None).unwrap();
        assert!(url.query_pairs().all(|(k, _)| k != "key" && k != "pageToken"));
    }

    #[test]
    fn test_item_ref() {
        let drive = catalog(config());
        let item = CatalogItem::new("1AbC-xyz_9", "clip.mp4");
        assert_eq!(
            drive.item_ref(&item),
            "https://drive.google.com/uc?export=download&id=1AbC-xyz_9"
        );
    }

    #[test]
    fn test_parse_file_list() {
        let body = r#"{
            "nextPageToken": "abc",
            "files": [
                {"id": "1", "name": "2.mp4", "createdTime": "2026-01-02T00:00:00Z"},
                {"id": "2", "name": "1.mp4"}
            ]
        }"#;
        let page: FileList = serde_json::from_str(body).unwrap();
        assert_eq!(page.files.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        let empty: FileList = serde_json::from_str("{}").unwrap();
        assert!(empty.files.is_empty());
        assert!(empty.next_page_token.is_none());
    }
}
