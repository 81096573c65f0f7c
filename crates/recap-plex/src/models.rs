//! Plex `MediaContainer` payloads and their conversion into core records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use recap_core::{EpisodeRecord, LookbackWindow, Movie, RecordError};
use serde::Deserialize;

/// Plex metadata type codes used in `type=` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Movie,
    Show,
    Episode,
}

impl ItemType {
    pub const fn code(self) -> u8 {
        match self {
            Self::Movie => 1,
            Self::Show => 2,
            Self::Episode => 4,
        }
    }
}

/// Top-level envelope of every JSON response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// Library section listing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirectoryContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<Section>,
}

/// Item listing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<Metadata>,
}

/// A library section, e.g. "Movies" or "TV Shows".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One item of a section listing.
///
/// Movies, shows and episodes share this shape; which fields are set depends
/// on the item type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub rating_key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_sort: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Unix seconds.
    #[serde(default)]
    pub added_at: Option<i64>,
    #[serde(default)]
    pub grandparent_title: Option<String>,
    #[serde(default)]
    pub grandparent_rating_key: Option<String>,
    /// Season number of an episode.
    #[serde(default)]
    pub parent_index: Option<u32>,
    /// Episode number within its season.
    #[serde(default)]
    pub index: Option<u32>,
}

impl Metadata {
    fn added_at(&self) -> Result<DateTime<Utc>, RecordError> {
        self.added_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(RecordError::Missing { field: "added at" })
    }

    /// Whether the item was added inside `window`.
    ///
    /// Items without a usable timestamp count as inside, so conversion
    /// reports them as malformed.
    pub fn added_within(&self, window: &LookbackWindow) -> bool {
        self.added_at().map_or(true, |added| window.contains(added))
    }

    /// Converts a movie item.
    pub fn to_movie(&self) -> Result<Movie, RecordError> {
        let title = self
            .title
            .as_deref()
            .ok_or(RecordError::Missing { field: "title" })?;
        let year = self.year.ok_or(RecordError::Missing { field: "year" })?;
        let movie = Movie::new(title, year, self.added_at()?)?;
        Ok(match self.title_sort.as_deref() {
            Some(sort) => movie.with_sort_title(sort),
            None => movie,
        })
    }

    /// Converts an episode item.
    ///
    /// `show_sort_titles` maps a show's rating key to its sort title; shows
    /// not in the map sort by their display title.
    pub fn to_episode(
        &self,
        show_sort_titles: &HashMap<String, String>,
    ) -> Result<EpisodeRecord, RecordError> {
        let show_name = self
            .grandparent_title
            .as_deref()
            .ok_or(RecordError::Missing { field: "show title" })?;
        let season = self
            .parent_index
            .ok_or(RecordError::Missing { field: "season number" })?;
        let episode = self
            .index
            .ok_or(RecordError::Missing { field: "episode number" })?;
        let episode_name = self
            .title
            .as_deref()
            .ok_or(RecordError::Missing { field: "episode title" })?;

        let record = EpisodeRecord::new(show_name, season, episode, episode_name, self.added_at()?)?;
        let sort_title = self
            .grandparent_rating_key
            .as_ref()
            .and_then(|key| show_sort_titles.get(key));
        Ok(match sort_title {
            Some(sort) => record.with_show_sort_name(sort.as_str()),
            None => record,
        })
    }
}

/// Converts the movie items added inside `window`.
pub(crate) fn movies_within(
    items: &[Metadata],
    window: &LookbackWindow,
) -> Result<Vec<Movie>, RecordError> {
    items
        .iter()
        .filter(|item| item.added_within(window))
        .map(Metadata::to_movie)
        .collect()
}

/// Converts the episode items added inside `window`.
pub(crate) fn episodes_within(
    items: &[Metadata],
    show_sort_titles: &HashMap<String, String>,
    window: &LookbackWindow,
) -> Result<Vec<EpisodeRecord>, RecordError> {
    items
        .iter()
        .filter(|item| item.added_within(window))
        .map(|item| item.to_episode(show_sort_titles))
        .collect()
}

/// Maps show rating keys to sort titles, skipping shows without one.
pub(crate) fn show_sort_titles(shows: &[Metadata]) -> HashMap<String, String> {
    shows
        .iter()
        .filter_map(|show| {
            let key = show.rating_key.clone()?;
            let sort = show.title_sort.clone().or_else(|| show.title.clone())?;
            Some((key, sort))
        })
        .collect()
}
