// src/services/facebook.rs

//! Facebook Page video publisher.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::FacebookConfig;
use crate::services::Publisher;
use crate::utils::http::api_error_message;

const GRAPH_BASE: &str = "https://graph.facebook.com/";

#[derive(Debug, Deserialize)]
struct CreatedVideo {
    id: String,
}

/// Publishes videos to a Page through the Graph API `/{page}/videos` edge.
///
/// The video is fetched by Facebook from `file_url`; nothing is downloaded
/// or uploaded locally.
pub struct GraphPublisher {
    client: Client,
    config: FacebookConfig,
}

impl GraphPublisher {
    pub fn new(client: Client, config: &FacebookConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    fn videos_url(&self) -> Result<Url> {
        let path = format!("{}/{}/videos", self.config.api_version, self.config.page_id);
        Ok(Url::parse(GRAPH_BASE)?.join(&path)?)
    }

    fn form<'a>(&'a self, item_ref: &'a str, caption: &'a str) -> [(&'static str, &'a str); 4] {
        [
            ("file_url", item_ref),
            ("description", caption),
            ("access_token", self.config.access_token.as_str()),
            ("published", if self.config.published { "true" } else { "false" }),
        ]
    }
}

#[async_trait]
impl Publisher for GraphPublisher {
    async fn publish(&self, item_ref: &str, caption: &str) -> Result<String> {
        let response = self
            .client
            .post(self.videos_url()?)
            .form(&self.form(item_ref, caption))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::publish(
                item_ref,
                status.as_u16(),
                api_error_message(&body),
            ));
        }

        let created: CreatedVideo = serde_json::from_str(&body)?;
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher() -> GraphPublisher {
        let config = FacebookConfig {
            page_id: "1029384756".into(),
            access_token: "page-token".into(),
            ..FacebookConfig::default()
        };
        GraphPublisher::new(Client::new(), &config)
    }

    #[test]
    fn test_videos_url() {
        assert_eq!(
            publisher().videos_url().unwrap().as_str(),
            "https://graph.facebook.com/v20.0/1029384756/videos"
        );
    }

    #[test]
    fn test_form() {
        let publisher = publisher();
        let form = publisher.form("https://drive.google.com/uc?id=x", "hello");

        assert_eq!(form[0], ("file_url", "https://drive.google.com/uc?id=x"));
        assert_eq!(form[1], ("description", "hello"));
        assert_eq!(form[2], ("access_token", "page-token"));
        assert_eq!(form[3], ("published", "true"));
    }

    #[test]
    fn test_parse_created_video() {
        let created: CreatedVideo = serde_json::from_str(r#"{"id": "10160"}"#).unwrap();
        assert_eq!(created.id, "10160");
    }
}
