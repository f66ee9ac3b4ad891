use async_trait::async_trait;

use crate::{
    config::Config,
    error::AppError,
};
use super::*;

impl WebhookBody {
    pub fn new(text: &str, destination: &str) -> Self {
        Self {
            text: text.to_string(),
            channel: destination.to_string(),
            username: USERNAME.to_string(),
            icon_emoji: ICON_EMOJI.to_string(),
        }
    }
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            destination: destination.into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl From<&Config> for WebhookNotifier {
    fn from(config: &Config) -> Self {
        Self::new(&config.web_hook_url, &config.destination)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, text: &str) -> Result<(), AppError> {
        let body = WebhookBody::new(text, &self.destination);
        log::trace!("posting to webhook for {}", self.destination);
        let response = self.client.post(&self.url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::NotifyStatus(status))
        }
    }
}
