//! # herald-config
//!
//! Layered configuration loading for Herald using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HERALD_*` prefix, `__` as separator)
//! 2. Legacy `DISCORD_WEBHOOK` / `DISCORD_WEBHOOK_PROJECTS` variables
//! 3. Project-level `.herald/config.toml`
//! 4. User-level `~/.config/herald/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HERALD_DISCORD__WEBHOOK_URL` -> `discord.webhook_url`,
//! `HERALD_CLASSIFIER__CYCLE_PROGRESS_DELTA` -> `classifier.cycle_progress_delta`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use herald_config::HeraldConfig;
//!
//! let config = HeraldConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//!
//! if config.discord.is_configured() {
//!     println!("Delivering to {}", config.discord.webhook_url);
//! }
//! ```

mod discord;
mod error;
mod server;

pub use discord::DiscordConfig;
pub use error::ConfigError;
pub use herald_core::ClassifierSettings;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed variables kept for existing deployments.
const LEGACY_ENV: [(&str, &str); 2] = [
    ("DISCORD_WEBHOOK", "discord.webhook_url"),
    ("DISCORD_WEBHOOK_PROJECTS", "discord.projects_webhook_url"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HeraldConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

impl HeraldConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`HeraldConfig::load_with_dotenv`] for
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Figment`] when a source cannot be read or a value has
    /// the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`HeraldConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can inspect it or layer more providers on
    /// top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path().filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".herald/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Legacy unprefixed variables
        figment = figment.merge(Self::legacy_env());

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("HERALD_").split("__"))
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let classifier = &self.classifier;
        if classifier.urgent_priority_threshold > 4 {
            return Err(ConfigError::invalid(
                "classifier.urgent_priority_threshold",
                "must be between 0 and 4",
            ));
        }
        for (field, delta) in [
            ("classifier.project_progress_delta", classifier.project_progress_delta),
            ("classifier.cycle_progress_delta", classifier.cycle_progress_delta),
        ] {
            if !(0.0..=1.0).contains(&delta) {
                return Err(ConfigError::invalid(field, "must be between 0 and 1"));
            }
        }
        for (field, chars) in [
            ("classifier.comment_preview_chars", classifier.comment_preview_chars),
            (
                "classifier.project_update_preview_chars",
                classifier.project_update_preview_chars,
            ),
        ] {
            if chars == 0 {
                return Err(ConfigError::invalid(field, "must be non-zero"));
            }
        }

        self.discord.validate()?;
        self.server.validate()
    }

    fn legacy_env() -> Env {
        Env::raw()
            .filter(|key| {
                LEGACY_ENV
                    .iter()
                    .any(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            })
            .map(|key| {
                LEGACY_ENV
                    .iter()
                    .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                    .map_or_else(|| key.into(), |(_, path)| (*path).into())
            })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("herald").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or falls back to the
    /// current directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
