//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use recap_notify::Credentials;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Plex Media Server.
    pub plex_url: String,

    /// `X-Plex-Token` used for every library request.
    #[serde(default)]
    pub plex_token: Option<String>,

    /// Server name shown in the report intro.
    #[serde(default)]
    pub server_name: Option<String>,

    /// Title of the movie library section.
    pub movie_library: String,

    /// Title of the TV library section.
    pub tv_library: String,

    /// Notifier codes used when the requested ones are invalid.
    pub default_notifiers: String,

    /// Seconds to wait after requesting a library re-scan.
    pub scan_delay_secs: u64,

    #[serde(default)]
    pub pushbullet_api_key: Option<String>,

    #[serde(default)]
    pub facebook_access_token: Option<String>,

    #[serde(default)]
    pub facebook_group_id: Option<String>,

    #[serde(default)]
    pub webhook_url: Option<String>,
}

fn redacted(value: Option<&str>) -> &'static str {
    if value.is_some() { "[REDACTED]" } else { "None" }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("plex_url", &self.plex_url)
            .field("plex_token", &redacted(self.plex_token.as_deref()))
            .field("server_name", &self.server_name)
            .field("movie_library", &self.movie_library)
            .field("tv_library", &self.tv_library)
            .field("default_notifiers", &self.default_notifiers)
            .field("scan_delay_secs", &self.scan_delay_secs)
            .field(
                "pushbullet_api_key",
                &redacted(self.pushbullet_api_key.as_deref()),
            )
            .field(
                "facebook_access_token",
                &redacted(self.facebook_access_token.as_deref()),
            )
            .field("facebook_group_id", &self.facebook_group_id)
            .field("webhook_url", &redacted(self.webhook_url.as_deref()))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plex_url: "http://localhost:32400".to_string(),
            plex_token: None,
            server_name: None,
            movie_library: "Movies".to_string(),
            tv_library: "TV Shows".to_string(),
            default_notifiers: "a".to_string(),
            scan_delay_secs: 60,
            pushbullet_api_key: None,
            facebook_access_token: None,
            facebook_group_id: None,
            webhook_url: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (RECAP_*)
        figment = figment.merge(Env::prefixed("RECAP_"));

        figment.extract()
    }

    /// Returns the Plex token, or an error naming where to set it.
    pub fn plex_token(&self) -> anyhow::Result<&str> {
        non_empty(self.plex_token.as_deref())
            .ok_or_else(|| anyhow!("missing Plex token (set RECAP_PLEX_TOKEN or plex_token in config.toml)"))
    }

    /// Returns the server name, or an error naming where to set it.
    pub fn server_name(&self) -> anyhow::Result<&str> {
        non_empty(self.server_name.as_deref())
            .ok_or_else(|| anyhow!("missing server name (set RECAP_SERVER_NAME or server_name in config.toml)"))
    }

    /// Checks the settings every run needs before any network call.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.plex_token()?;
        self.server_name()?;
        Ok(())
    }

    /// Transport credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            pushbullet_api_key: self.pushbullet_api_key.clone(),
            facebook_access_token: self.facebook_access_token.clone(),
            facebook_group_id: self.facebook_group_id.clone(),
            webhook_url: self.webhook_url.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the platform-specific config directory for recap.
///
/// On Linux: `~/.config/recap`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("recap"))
}
