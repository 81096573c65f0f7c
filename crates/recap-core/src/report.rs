//! Rendering the recently added summary.
//!
//! The report is three blocks concatenated in a fixed order: an intro line,
//! the movies block and the TV shows block. Each show is rendered either
//! episode by episode or collapsed to one line per season, depending on its
//! total episode count.

use std::fmt::Write;

use serde::Serialize;

use crate::grouping::Show;
use crate::media::Movie;

/// How a single show is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One line per episode.
    Detailed,
    /// One line per season with its episode count.
    Collapsed,
}

/// Picks the render mode for a show.
///
/// The decision uses the show's total episode count across all seasons,
/// so many small seasons still collapse once the total passes the threshold.
pub const fn render_mode(show: &Show, detail_threshold: usize) -> RenderMode {
    if show.episode_count() <= detail_threshold {
        RenderMode::Detailed
    } else {
        RenderMode::Collapsed
    }
}

/// Scalar inputs of a report, passed explicitly by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Length of the look-back window in days.
    pub day_count: u32,
    /// Display name of the library server.
    pub server_label: String,
    /// Largest per-show episode count that is still listed episode by episode.
    pub detail_threshold: usize,
}

impl ReportOptions {
    /// Renders the text report.
    pub fn render(&self, movies: &[Movie], shows: &[Show]) -> String {
        render(
            self.day_count,
            &self.server_label,
            movies,
            shows,
            self.detail_threshold,
        )
    }

    /// Builds the machine-readable form of the same report.
    pub fn summary<'a>(&'a self, movies: &'a [Movie], shows: &'a [Show]) -> Summary<'a> {
        Summary {
            day_count: self.day_count,
            server_label: &self.server_label,
            detail_threshold: self.detail_threshold,
            movies,
            shows: shows
                .iter()
                .map(|show| ShowSummary {
                    mode: render_mode(show, self.detail_threshold),
                    show,
                })
                .collect(),
        }
    }
}

/// Renders the full report: intro, movies, then TV shows.
///
/// `movies` are listed in the order given; `shows` are expected to come from
/// [`group_into_shows`](crate::group_into_shows).
pub fn render(
    day_count: u32,
    server_label: &str,
    movies: &[Movie],
    shows: &[Show],
    detail_threshold: usize,
) -> String {
    let mut output = format_intro(day_count, server_label);
    output.push_str(&format_movies(movies));
    output.push_str(&format_tv_shows(shows, detail_threshold));
    output
}

/// Formats the intro line.
pub fn format_intro(day_count: u32, server_label: &str) -> String {
    let mut output = if day_count == 1 {
        "The Daily Summary".to_string()
    } else {
        format!("The Summary of the past {day_count} days")
    };
    writeln!(
        output,
        " of recently added Movies and TV Shows from {server_label}:"
    )
    .unwrap();
    output
}

/// Formats the movies block.
pub fn format_movies(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "No Movies Added.\n".to_string();
    }

    let mut output = String::from("Movies:\n");
    for movie in movies {
        writeln!(output, "-{} ({})", movie.title, movie.year).unwrap();
    }
    output
}

/// Formats the TV shows block.
pub fn format_tv_shows(shows: &[Show], detail_threshold: usize) -> String {
    if shows.is_empty() {
        return "No Shows Added.".to_string();
    }

    let mut output = String::from("TV Shows:\n");
    for show in shows {
        writeln!(output, "-{}-", show.show_name()).unwrap();
        match render_mode(show, detail_threshold) {
            RenderMode::Detailed => {
                for season in show.seasons() {
                    for episode in season.episodes() {
                        writeln!(
                            output,
                            "---S{:02}E{:02} - {}",
                            episode.season_number, episode.episode_number, episode.episode_name
                        )
                        .unwrap();
                    }
                }
            }
            RenderMode::Collapsed => {
                for season in show.seasons() {
                    writeln!(
                        output,
                        "---{:02} episodes added in Season {:02}.",
                        season.episode_count(),
                        season.season_number()
                    )
                    .unwrap();
                }
            }
        }
    }
    output
}

// ========== JSON Output ==========

/// Machine-readable report.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub day_count: u32,
    pub server_label: &'a str,
    pub detail_threshold: usize,
    pub movies: &'a [Movie],
    pub shows: Vec<ShowSummary<'a>>,
}

/// A show together with the mode it renders in.
#[derive(Debug, Serialize)]
pub struct ShowSummary<'a> {
    pub mode: RenderMode,
    #[serde(flatten)]
    pub show: &'a Show,
}
