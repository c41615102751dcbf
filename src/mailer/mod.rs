//! Best-effort mail notifications via an HTTP relay.
//!
//! Failures are logged, never surfaced to the caller. When the relay is not
//! configured, events degrade to log lines so local and test deployments
//! need no mail credentials.

pub mod messages;

use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::Config;

#[derive(Clone)]
pub struct Mailer {
    http_client: Client,
    base_url: Option<String>,
    api_token: Option<String>,
    from: String,
    default_recipients: Vec<String>,
}

impl Mailer {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: config.mail_base_url.clone(),
            api_token: config.mail_api_token.clone(),
            from: config.mail_from.clone(),
            default_recipients: config.mail_recipients.clone(),
        }
    }

    /// Send a message to the default recipient list plus `extra_recipients`.
    ///
    /// Best-effort: relay errors are logged and swallowed.
    pub async fn send(&self, subject: &str, body: &str, extra_recipients: &[String]) {
        let mut recipients = self.default_recipients.clone();
        recipients.extend(extra_recipients.iter().cloned());

        let (Some(base_url), Some(token)) = (&self.base_url, &self.api_token) else {
            tracing::info!(
                subject,
                recipients = ?recipients,
                "mail relay not configured, notification logged only"
            );
            return;
        };

        if recipients.is_empty() {
            tracing::debug!(subject, "no recipients, skipping notification");
            return;
        }

        let url = format!("{base_url}/messages");
        let result = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({
                "from": self.from,
                "to": recipients,
                "subject": subject,
                "text": body,
            }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(subject, count = recipients.len(), "notification sent");
            }
            Ok(response) => {
                tracing::warn!(
                    subject,
                    status = %response.status(),
                    "mail relay rejected notification"
                );
            }
            Err(e) => {
                tracing::warn!(subject, error = %e, "failed to send notification");
            }
        }
    }

    /// Fire-and-forget dispatch, used after a transaction commits so that
    /// notification latency never holds a request open.
    pub fn spawn_send(&self, subject: String, body: String, extra_recipients: Vec<String>) {
        let mailer = self.clone();
        tokio::spawn(async move {
            mailer.send(&subject, &body, &extra_recipients).await;
        });
    }
}
