use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::vrm::models::InstallationsResponse;

pub struct VrmClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl VrmClient {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: config.vrm_base_url.clone(),
            api_key: config.vrm_api_key.clone(),
        }
    }

    /// List all installations visible to the configured API key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::VrmApi` if no key is configured, the request fails,
    /// or the portal returns an error status.
    pub async fn get_installations(&self) -> AppResult<InstallationsResponse> {
        let Some(api_key) = &self.api_key else {
            return Err(AppError::VrmApi("No API key configured".to_string()));
        };

        let url = format!("{}/installations", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .header("X-Authorization", format!("Bearer {api_key}"))
            .send()
            .await
            .map_err(|e| AppError::VrmApi(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::VrmApi("Rate limited (429)".to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::VrmApi(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::VrmApi(format!("Failed to parse response: {e}")))
    }
}
