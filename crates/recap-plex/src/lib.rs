//! Plex Media Server integration for recap.
//!
//! Talks to a single server with an already-issued `X-Plex-Token`:
//! - Listing library sections and resolving them by title
//! - Fetching recently added movies and episodes
//! - Triggering a section re-scan

mod models;

use std::fmt;
use std::time::Duration;

use recap_core::{EpisodeRecord, LookbackWindow, Movie, RecordError};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use models::{ItemType, Metadata, Section};
use models::{
    DirectoryContainer, Envelope, MetadataContainer, episodes_within, movies_within,
    show_sort_titles,
};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const PRODUCT_NAME: &str = "recap";
/// Longest error body kept in `PlexError::Api`.
const MAX_ERROR_BODY: usize = 200;

/// Plex client errors.
#[derive(Debug, Error)]
pub enum PlexError {
    /// The provided token was invalid.
    #[error("invalid Plex token: {reason}")]
    InvalidToken { reason: &'static str },
    /// The server URL could not be used.
    #[error("invalid Plex server URL: {url}")]
    InvalidUrl { url: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Server returned an error response.
    #[error("Plex API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// No library section has the requested title.
    #[error("library section not found: {title}")]
    SectionNotFound { title: String },
    /// An item could not be turned into a complete record.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Plex Media Server client.
///
/// Cloning shares the underlying HTTP connection pool.
#[derive(Clone)]
pub struct PlexClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for PlexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl PlexClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, if the URL
    /// is not http(s), or if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, PlexError> {
        let token = token.into();
        if token.is_empty() {
            return Err(PlexError::InvalidToken {
                reason: "token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(PlexError::InvalidToken {
                reason: "token cannot be whitespace-only",
            });
        }

        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PlexError::InvalidUrl { url: base_url });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(PlexError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn request(&self, path: &str, query: &[(&str, String)]) -> Result<String, PlexError> {
        tracing::debug!(path, "plex request");
        let response = self
            .http
            .get(self.url(path))
            .header("X-Plex-Token", &self.token)
            .header("X-Plex-Product", PRODUCT_NAME)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PlexError> {
        let body = self.request(path, query).await?;
        serde_json::from_str(&body).map_err(|err| PlexError::InvalidResponse(err.to_string()))
    }

    /// Lists all library sections.
    pub async fn sections(&self) -> Result<Vec<Section>, PlexError> {
        let envelope: Envelope<DirectoryContainer> = self.get("/library/sections", &[]).await?;
        Ok(envelope.media_container.directories)
    }

    /// Finds a library section by its exact title.
    pub async fn section_by_title(&self, title: &str) -> Result<Section, PlexError> {
        let sections = self.sections().await?;
        find_section(sections, title)
    }

    async fn items(
        &self,
        section: &Section,
        item_type: ItemType,
        max: Option<usize>,
    ) -> Result<Vec<Metadata>, PlexError> {
        let path = format!("/library/sections/{}/all", section.key);
        let envelope: Envelope<MetadataContainer> =
            self.get(&path, &listing_query(item_type, max)).await?;
        Ok(envelope.media_container.metadata)
    }

    /// Fetches up to `max` movies, newest first, keeping those added inside
    /// `window`.
    ///
    /// Items outside the window are dropped before conversion, so only a
    /// malformed item inside it fails the call.
    pub async fn recently_added_movies(
        &self,
        section: &Section,
        max: usize,
        window: &LookbackWindow,
    ) -> Result<Vec<Movie>, PlexError> {
        let items = self.items(section, ItemType::Movie, Some(max)).await?;
        let movies = movies_within(&items, window)?;
        tracing::info!(section = %section.title, count = movies.len(), "fetched recent movies");
        Ok(movies)
    }

    /// Fetches up to `max` episodes, newest first, keeping those added
    /// inside `window`.
    ///
    /// Show sort titles are resolved with one extra listing of the section's
    /// shows, since episode items do not carry them.
    pub async fn recently_added_episodes(
        &self,
        section: &Section,
        max: usize,
        window: &LookbackWindow,
    ) -> Result<Vec<EpisodeRecord>, PlexError> {
        let items = self.items(section, ItemType::Episode, Some(max)).await?;
        if !items.iter().any(|item| item.added_within(window)) {
            return Ok(Vec::new());
        }

        let shows = self.items(section, ItemType::Show, None).await?;
        let sort_titles = show_sort_titles(&shows);
        let episodes = episodes_within(&items, &sort_titles, window)?;
        tracing::info!(section = %section.title, count = episodes.len(), "fetched recent episodes");
        Ok(episodes)
    }

    /// Asks the server to re-scan a section for new files.
    pub async fn refresh_section(&self, section: &Section) -> Result<(), PlexError> {
        let path = format!("/library/sections/{}/refresh", section.key);
        self.request(&path, &[]).await?;
        tracing::info!(section = %section.title, "library refresh requested");
        Ok(())
    }
}

fn find_section(sections: Vec<Section>, title: &str) -> Result<Section, PlexError> {
    sections
        .into_iter()
        .find(|section| section.title == title)
        .ok_or_else(|| PlexError::SectionNotFound {
            title: title.to_string(),
        })
}

fn listing_query(item_type: ItemType, max: Option<usize>) -> Vec<(&'static str, String)> {
    let mut query = vec![("type", item_type.code().to_string())];
    if let Some(max) = max {
        query.push(("sort", "addedAt:desc".to_string()));
        query.push(("X-Plex-Container-Start", "0".to_string()));
        query.push(("X-Plex-Container-Size", max.to_string()));
    }
    query
}

fn api_error(status: u16, body: &str) -> PlexError {
    let message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    PlexError::Api { status, message }
}
