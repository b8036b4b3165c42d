use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use fleetdesk_core::config::NotifyConfig;

use crate::notifier::{Notifier, NotifyError, ReviewNotification};

/// JSON POST delivery to the organization's configured hook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    auth_token: Option<SecretString>,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        auth_token: Option<SecretString>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into(), auth_token })
    }

    /// `None` when notifications are disabled or no endpoint is configured;
    /// config validation has already required a URL for the enabled case.
    pub fn from_config(config: &NotifyConfig) -> Result<Option<Self>, reqwest::Error> {
        if !config.enabled {
            return Ok(None);
        }
        let Some(url) = &config.webhook_url else {
            return Ok(None);
        };
        Self::new(
            url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.auth_token.clone(),
        )
        .map(Some)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &ReviewNotification) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.url).json(notification);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        if let Err(error) = response.error_for_status_ref() {
            return Err(NotifyError::Rejected(error.to_string()));
        }
        Ok(())
    }
}
