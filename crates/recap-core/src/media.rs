//! Media records supplied by the library client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed record errors.
///
/// Raised when library metadata cannot be turned into a complete record.
/// A report with gaps is worse than a failed run, so callers abort on these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required text field was present but empty.
    #[error("malformed record: {field} cannot be empty")]
    Empty { field: &'static str },

    /// A required field was absent.
    #[error("malformed record: missing {field}")]
    Missing { field: &'static str },
}

/// A movie added to the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Display title.
    pub title: String,

    /// Title used for ordering (e.g. "Matrix, The"). Defaults to the title.
    pub sort_title: String,

    /// Release year.
    pub year: i32,

    /// When the movie was added to the library.
    pub added_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a movie, rejecting an empty title.
    pub fn new(
        title: impl Into<String>,
        year: i32,
        added_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(RecordError::Empty { field: "title" });
        }
        Ok(Self {
            sort_title: title.clone(),
            title,
            year,
            added_at,
        })
    }

    /// Overrides the sort title. An empty value keeps the display title.
    #[must_use]
    pub fn with_sort_title(mut self, sort_title: impl Into<String>) -> Self {
        let sort_title = sort_title.into();
        if !sort_title.trim().is_empty() {
            self.sort_title = sort_title;
        }
        self
    }
}

/// Sorts movies by sort title, case-insensitively.
///
/// The stable sort keeps the library's order (newest first) for equal titles.
pub fn sort_movies(movies: &mut [Movie]) {
    movies.sort_by_cached_key(|movie| movie.sort_title.to_lowercase());
}

/// A single TV episode, flat, as it arrives from the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Show title as displayed.
    pub show_name: String,

    /// Show title used only for ordering.
    pub show_sort_name: String,

    pub season_number: u32,

    pub episode_number: u32,

    pub episode_name: String,

    /// When the episode was added to the library.
    pub added_at: DateTime<Utc>,
}

impl EpisodeRecord {
    /// Creates an episode record, rejecting an empty show name.
    ///
    /// The sort name starts out equal to the show name.
    pub fn new(
        show_name: impl Into<String>,
        season_number: u32,
        episode_number: u32,
        episode_name: impl Into<String>,
        added_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        let show_name = show_name.into();
        if show_name.trim().is_empty() {
            return Err(RecordError::Empty { field: "show name" });
        }
        Ok(Self {
            show_sort_name: show_name.clone(),
            show_name,
            season_number,
            episode_number,
            episode_name: episode_name.into(),
            added_at,
        })
    }

    /// Overrides the show sort name. An empty value keeps the show name.
    #[must_use]
    pub fn with_show_sort_name(mut self, sort_name: impl Into<String>) -> Self {
        let sort_name = sort_name.into();
        if !sort_name.trim().is_empty() {
            self.show_sort_name = sort_name;
        }
        self
    }
}
