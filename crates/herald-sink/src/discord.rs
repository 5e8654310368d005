//! Discord incoming-webhook sink.

use std::time::Duration;

use herald_config::DiscordConfig;
use serde::Serialize;

use crate::http::check_response;
use crate::{Channel, DeliverySink, SinkError};

/// Discord rejects message content longer than this many characters.
pub const DISCORD_CONTENT_LIMIT: usize = 2000;

const TRUNCATION_MARK: &str = "...";

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts `{"content": text}` to a Discord webhook URL.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    http: reqwest::Client,
    webhook_url: String,
    projects_url: Option<String>,
}

impl DiscordWebhook {
    /// # Errors
    ///
    /// [`SinkError::NotConfigured`] for an empty URL, [`SinkError::Http`] if
    /// the HTTP client cannot be built.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, SinkError> {
        let webhook_url = webhook_url.into();
        if webhook_url.is_empty() {
            return Err(SinkError::NotConfigured);
        }
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("herald/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(10))
                .build()?,
            webhook_url,
            projects_url: None,
        })
    }

    /// Route [`Channel::Projects`] to a separate webhook. An empty URL keeps
    /// projects on the default webhook.
    #[must_use]
    pub fn with_projects_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.projects_url = (!url.is_empty()).then_some(url);
        self
    }

    /// # Errors
    ///
    /// See [`DiscordWebhook::new`].
    pub fn from_config(config: &DiscordConfig) -> Result<Self, SinkError> {
        Ok(Self::new(config.webhook_url.clone())?.with_projects_url(config.projects_url()))
    }

    #[must_use]
    pub fn url_for(&self, channel: Channel) -> &str {
        match (channel, self.projects_url.as_deref()) {
            (Channel::Projects, Some(url)) => url,
            _ => &self.webhook_url,
        }
    }
}

impl DeliverySink for DiscordWebhook {
    async fn send(&self, text: &str, channel: Channel) -> Result<(), SinkError> {
        let content = clamp_content(text);
        let resp = self
            .http
            .post(self.url_for(channel))
            .json(&WebhookMessage { content: &content })
            .send()
            .await?;
        check_response(resp).await?;
        tracing::debug!(%channel, chars = content.chars().count(), "discord message delivered");
        Ok(())
    }
}

/// Fit `text` into [`DISCORD_CONTENT_LIMIT`] characters, marking the cut.
#[must_use]
pub fn clamp_content(text: &str) -> std::borrow::Cow<'_, str> {
    if text.chars().count() <= DISCORD_CONTENT_LIMIT {
        return std::borrow::Cow::Borrowed(text);
    }
    let keep = DISCORD_CONTENT_LIMIT - TRUNCATION_MARK.len();
    let cut = text
        .char_indices()
        .nth(keep)
        .map_or(text.len(), |(index, _)| index);
    std::borrow::Cow::Owned(format!("{}{TRUNCATION_MARK}", &text[..cut]))
}
