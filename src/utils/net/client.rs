//! HTTP client utilities
//!
//! Client construction and small URL/header helpers shared by the single-call
//! platform client and the batch transport.

use crate::config::PlatformConfig;
use crate::utils::error::{Result, SyncError};
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;

/// Utility functions for HTTP client operations
pub struct ClientUtils;

impl ClientUtils {
    /// Creates an HTTP client with the platform's timeout and user agent
    pub fn create_http_client(config: &PlatformConfig) -> Result<Client> {
        ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SyncError::config(format!("Failed to build HTTP client: {}", e)))
    }

    pub fn add_path_to_api_base(api_base: &str, ending_path: &str) -> String {
        let base = api_base.trim_end_matches('/');
        let path = ending_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn validate_url(url: &str) -> std::result::Result<(), String> {
        let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(format!(
                "Unsupported URL scheme '{}'. Only http and https are supported",
                scheme
            )),
        }
    }

    /// Splits a `Content-Type` header into its media type and parameters
    pub fn parse_content_type(content_type: &str) -> (String, HashMap<String, String>) {
        let parts: Vec<&str> = content_type.split(';').collect();
        let media_type = parts[0].trim().to_lowercase();

        let mut parameters = HashMap::new();
        for part in parts.iter().skip(1) {
            if let Some(eq_pos) = part.find('=') {
                let key = part[..eq_pos].trim().to_lowercase();
                let value = part[eq_pos + 1..].trim().trim_matches('"');
                parameters.insert(key, value.to_string());
            }
        }

        (media_type, parameters)
    }
}
