//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

/// Summarize recently added Plex media.
///
/// Collects the movies and TV episodes added within the look-back window,
/// renders a short report and posts it to the selected notification services.
#[derive(Debug, Parser)]
#[command(name = "recap", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub summary: SummaryArgs,
}

/// Options of a summary run.
#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    /// Number of days to look back for recently added media.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,

    /// Notification services, concatenated: p(ushbullet), f(acebook), w(ebhook), a(ll).
    #[arg(short, long, default_value = "a")]
    pub notifiers: String,

    /// Maximum number of movies to fetch.
    #[arg(short, long, default_value_t = 50)]
    pub max_movies: usize,

    /// Maximum number of episodes to fetch.
    #[arg(long, visible_alias = "tv", default_value_t = 200)]
    pub max_tv: usize,

    /// Largest per-show episode count listed episode by episode before
    /// collapsing to one line per season.
    #[arg(long, visible_alias = "nd", default_value_t = 2)]
    pub num_detailed: usize,

    /// Print the settings and the report instead of sending it.
    #[arg(short, long)]
    pub test: bool,

    /// Also print the report as JSON (with --test).
    #[arg(long, requires = "test")]
    pub json: bool,

    /// Re-scan the libraries and wait before fetching.
    #[arg(long)]
    pub scan: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["recap"]).unwrap();
        let args = cli.summary;
        assert_eq!(args.days, 1);
        assert_eq!(args.notifiers, "a");
        assert_eq!(args.max_movies, 50);
        assert_eq!(args.max_tv, 200);
        assert_eq!(args.num_detailed, 2);
        assert!(!args.test);
        assert!(!args.scan);
    }

    #[test]
    fn test_short_and_alias_flags() {
        let cli = Cli::try_parse_from([
            "recap", "-d", "5", "-n", "fp", "--tv", "500", "-m", "100", "--nd", "5", "-t",
        ])
        .unwrap();
        let args = cli.summary;
        assert_eq!(args.days, 5);
        assert_eq!(args.notifiers, "fp");
        assert_eq!(args.max_tv, 500);
        assert_eq!(args.max_movies, 100);
        assert_eq!(args.num_detailed, 5);
        assert!(args.test);
    }

    #[test]
    fn test_zero_days_rejected() {
        assert!(Cli::try_parse_from(["recap", "--days", "0"]).is_err());
    }

    #[test]
    fn test_json_requires_test() {
        assert!(Cli::try_parse_from(["recap", "--json"]).is_err());
        assert!(Cli::try_parse_from(["recap", "--test", "--json"]).is_ok());
    }
}
