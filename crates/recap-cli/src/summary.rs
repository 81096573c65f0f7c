//! Summary run: fetch, filter, group, render, then print or dispatch.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use recap_core::{
    EpisodeRecord, LookbackWindow, Movie, ReportOptions, Show, group_into_shows, sort_movies,
};
use recap_notify::{NotifierSelection, dispatch};
use recap_plex::PlexClient;

use crate::{Config, SummaryArgs};

/// Media that falls inside the window, ready for rendering.
#[derive(Debug)]
pub struct RecentMedia {
    pub movies: Vec<Movie>,
    pub shows: Vec<Show>,
}

/// Sorts movies by sort title and groups episodes into shows.
///
/// Both lists are already limited to the look-back window by the library
/// client.
pub fn collect_recent(mut movies: Vec<Movie>, episodes: Vec<EpisodeRecord>) -> RecentMedia {
    sort_movies(&mut movies);
    tracing::debug!(
        movies = movies.len(),
        episodes = episodes.len(),
        "collected recent media"
    );

    RecentMedia {
        movies,
        shows: group_into_shows(episodes),
    }
}

/// Writes the resolved settings followed by the report.
pub fn write_dry_run<W: Write>(
    writer: &mut W,
    args: &SummaryArgs,
    config: &Config,
    selection: &NotifierSelection,
    report: &str,
) -> Result<()> {
    writeln!(writer, "Days:          {}", args.days)?;
    writeln!(writer, "Notifiers:     {selection}")?;
    writeln!(writer, "Max movies:    {}", args.max_movies)?;
    writeln!(writer, "Max episodes:  {}", args.max_tv)?;
    writeln!(writer, "Detailed max:  {}", args.num_detailed)?;
    writeln!(writer, "Plex server:   {}", config.plex_url)?;
    writeln!(
        writer,
        "Libraries:     {} / {}",
        config.movie_library, config.tv_library
    )?;
    writeln!(writer)?;
    writeln!(writer, "{report}")?;
    Ok(())
}

/// Runs the summary command.
pub fn run<W: Write>(writer: &mut W, args: &SummaryArgs, config: &Config) -> Result<()> {
    config.validate()?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(run_async(writer, args, config))
}

async fn run_async<W: Write>(writer: &mut W, args: &SummaryArgs, config: &Config) -> Result<()> {
    let server_label = config.server_name()?;
    let client = PlexClient::new(&config.plex_url, config.plex_token()?)
        .context("failed to create Plex client")?;

    let movie_section = client
        .section_by_title(&config.movie_library)
        .await
        .context("failed to resolve movie library")?;
    let tv_section = client
        .section_by_title(&config.tv_library)
        .await
        .context("failed to resolve TV library")?;

    if args.scan {
        client
            .refresh_section(&movie_section)
            .await
            .context("failed to refresh movie library")?;
        client
            .refresh_section(&tv_section)
            .await
            .context("failed to refresh TV library")?;
        tracing::info!(seconds = config.scan_delay_secs, "waiting for library scan");
        tokio::time::sleep(Duration::from_secs(config.scan_delay_secs)).await;
    }

    // The window ends after the optional scan so freshly indexed items count.
    let window = LookbackWindow::ending_at(Utc::now(), args.days)?;
    tracing::debug!(start = %window.start(), end = %window.end(), "look-back window");

    let movies = client
        .recently_added_movies(&movie_section, args.max_movies, &window)
        .await
        .context("failed to fetch recently added movies")?;
    let episodes = client
        .recently_added_episodes(&tv_section, args.max_tv, &window)
        .await
        .context("failed to fetch recently added episodes")?;

    let recent = collect_recent(movies, episodes);
    let options = ReportOptions {
        day_count: args.days,
        server_label: server_label.to_string(),
        detail_threshold: args.num_detailed,
    };
    let report = options.render(&recent.movies, &recent.shows);
    let selection = NotifierSelection::resolve(&args.notifiers, &config.default_notifiers);

    if args.test {
        write_dry_run(writer, args, config, &selection, &report)?;
        if args.json {
            let summary = options.summary(&recent.movies, &recent.shows);
            writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
        return Ok(());
    }

    let title = format!("{server_label} Summary");
    let outcome = dispatch(&selection, &config.credentials(), &title, &report).await;
    if !outcome.is_success() {
        let failed: Vec<_> = outcome
            .failed
            .iter()
            .map(|(kind, err)| format!("{kind}: {err}"))
            .collect();
        bail!("failed to deliver summary ({})", failed.join("; "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Duration as ChronoDuration, TimeZone};
    use insta::assert_snapshot;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 16, 0, 0).unwrap()
    }

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        now() - ChronoDuration::hours(hours)
    }

    fn movie(title: &str, year: i32, added: DateTime<Utc>) -> Movie {
        Movie::new(title, year, added).unwrap()
    }

    fn ep(show: &str, season: u32, episode: u32, name: &str, added: DateTime<Utc>) -> EpisodeRecord {
        EpisodeRecord::new(show, season, episode, name, added).unwrap()
    }

    fn args() -> SummaryArgs {
        SummaryArgs {
            days: 1,
            notifiers: "a".to_string(),
            max_movies: 50,
            max_tv: 200,
            num_detailed: 2,
            test: true,
            json: false,
            scan: false,
        }
    }

    #[test]
    fn test_collect_recent_sorts_and_groups() {
        let recent = collect_recent(
            vec![
                movie("Zodiac", 2007, hours_ago(2)),
                movie("arrival", 2016, hours_ago(23)),
            ],
            vec![
                ep("Foo", 1, 2, "Second", hours_ago(1)),
                ep("Foo", 1, 1, "Pilot", hours_ago(3)),
            ],
        );

        let titles: Vec<_> = recent.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["arrival", "Zodiac"]);

        assert_eq!(recent.shows.len(), 1);
        assert_eq!(recent.shows[0].show_name(), "Foo");
        assert_eq!(recent.shows[0].episode_count(), 2);
    }

    #[test]
    fn test_collect_recent_empty() {
        let recent = collect_recent(Vec::new(), Vec::new());
        assert!(recent.movies.is_empty());
        assert!(recent.shows.is_empty());
    }

    #[test]
    fn test_dry_run_output() {
        let recent = collect_recent(
            vec![movie("Arrival", 2016, hours_ago(2))],
            vec![
                ep("Foo", 1, 1, "Pilot", hours_ago(1)),
                ep("Foo", 1, 2, "Second", hours_ago(1)),
            ],
        );
        let options = ReportOptions {
            day_count: 1,
            server_label: "MyServer".to_string(),
            detail_threshold: 2,
        };
        let report = options.render(&recent.movies, &recent.shows);
        let selection = NotifierSelection::resolve("fp", "a");

        let mut output = Vec::new();
        write_dry_run(&mut output, &args(), &Config::default(), &selection, &report).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output);
    }

    #[test]
    fn test_run_rejects_missing_token_before_network() {
        let mut output = Vec::new();
        let config = Config {
            server_name: Some("MyServer".to_string()),
            ..Config::default()
        };
        let err = run(&mut output, &args(), &config).unwrap_err();
        assert!(err.to_string().contains("missing Plex token"));
        assert!(output.is_empty());
    }
}
