// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::models::HttpConfig;

/// Longest raw body echoed back in an error message.
const MAX_ERROR_BODY: usize = 300;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract a readable message from an API error body.
///
/// Google and Graph APIs both answer with `{"error": {"message": ...}}`.
/// Anything else is returned as (truncated) raw text.
pub fn api_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_json() {
        let body = r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190}}"#;
        assert_eq!(api_error_message(body), "Invalid OAuth access token.");
    }

    #[test]
    fn test_api_error_message_plain() {
        assert_eq!(api_error_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(api_error_message(""), "empty response body");

        let long = "x".repeat(1000);
        assert_eq!(api_error_message(&long).len(), MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_create_client() {
        assert!(create_async_client(&HttpConfig::default()).is_ok());
    }
}
