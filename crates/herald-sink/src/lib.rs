//! # herald-sink
//!
//! Delivery of finalized notification text. The engine decides *what* to
//! say; a [`DeliverySink`] decides *where* it goes. Delivery is best-effort:
//! sinks never retry, and a failure is reported to the caller as a
//! [`SinkError`].

mod discord;
mod error;
mod http;

pub use discord::{DISCORD_CONTENT_LIMIT, DiscordWebhook, clamp_content};
pub use error::SinkError;

use std::fmt;
use std::future::Future;

/// Destination channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Issues, comments, cycles, SLAs.
    Default,
    /// Projects and project updates.
    Projects,
}

impl Channel {
    /// Project-level entities go to [`Channel::Projects`].
    #[must_use]
    pub const fn for_project_related(project_related: bool) -> Self {
        if project_related {
            Self::Projects
        } else {
            Self::Default
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Projects => "projects",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can deliver notification text.
pub trait DeliverySink: Send + Sync {
    /// Deliver `text` to `channel`.
    fn send(&self, text: &str, channel: Channel)
    -> impl Future<Output = Result<(), SinkError>> + Send;
}
