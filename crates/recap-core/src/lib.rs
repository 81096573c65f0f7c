//! Core domain logic for the media summary.
//!
//! This crate contains the pure, I/O-free parts of the pipeline:
//! - Media records: movies and episodes as supplied by the library client
//! - Grouping: folding flat episodes into Shows → Seasons → Episodes
//! - Report: rendering the grouped tree and movies into the summary text
//! - Window: the look-back interval used to filter recently added media

pub mod grouping;
pub mod media;
pub mod report;
pub mod window;

pub use grouping::{Season, Show, flatten, group_into_shows};
pub use media::{EpisodeRecord, Movie, RecordError, sort_movies};
pub use report::{RenderMode, ReportOptions, Summary, render, render_mode};
pub use window::{LookbackWindow, WindowError};
