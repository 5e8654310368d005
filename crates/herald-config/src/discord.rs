//! Discord delivery configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscordConfig {
    /// Incoming-webhook URL for the default channel.
    #[serde(default)]
    pub webhook_url: String,

    /// Optional webhook URL for project and project-update notifications.
    /// Empty means "use `webhook_url`".
    #[serde(default)]
    pub projects_webhook_url: String,
}

impl DiscordConfig {
    /// Check if a default channel webhook is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    /// Webhook URL for project notifications, falling back to the default
    /// channel.
    #[must_use]
    pub fn projects_url(&self) -> &str {
        if self.projects_webhook_url.is_empty() {
            &self.webhook_url
        } else {
            &self.projects_webhook_url
        }
    }

    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] when no default webhook is set.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "discord".into(),
            })
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("discord.webhook_url", &self.webhook_url),
            ("discord.projects_webhook_url", &self.projects_webhook_url),
        ] {
            if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::invalid(field, "must be an http(s) URL"));
            }
        }
        Ok(())
    }
}
