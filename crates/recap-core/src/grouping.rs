//! Grouping flat episode records into Shows → Seasons → Episodes.

use std::collections::HashMap;

use serde::Serialize;

use crate::media::EpisodeRecord;

/// Episodes of one show that share a season number, in episode order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    show_name: String,
    season_number: u32,
    episodes: Vec<EpisodeRecord>,
    episode_count: usize,
}

impl Season {
    fn from_run(show_name: &str, run: &[EpisodeRecord]) -> Self {
        Self {
            show_name: show_name.to_string(),
            season_number: run[0].season_number,
            episodes: run.to_vec(),
            episode_count: run.len(),
        }
    }

    pub fn show_name(&self) -> &str {
        &self.show_name
    }

    pub const fn season_number(&self) -> u32 {
        self.season_number
    }

    pub fn episodes(&self) -> &[EpisodeRecord] {
        &self.episodes
    }

    pub const fn episode_count(&self) -> usize {
        self.episode_count
    }
}

/// A TV show with its seasons in ascending season order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    show_name: String,
    seasons: Vec<Season>,
    episode_count: usize,
}

impl Show {
    /// Builds a show from every episode sharing one display name.
    ///
    /// Episodes are re-sorted by (season, episode) so that a show merged from
    /// two sort names still yields one season per number.
    fn from_episodes(show_name: String, mut episodes: Vec<EpisodeRecord>) -> Self {
        episodes.sort_by_key(|e| (e.season_number, e.episode_number));

        let seasons: Vec<Season> = episodes
            .chunk_by(|a, b| a.season_number == b.season_number)
            .map(|run| Season::from_run(&show_name, run))
            .collect();
        let episode_count = seasons.iter().map(Season::episode_count).sum();

        Self {
            show_name,
            seasons,
            episode_count,
        }
    }

    pub fn show_name(&self) -> &str {
        &self.show_name
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Total episodes across all seasons.
    pub const fn episode_count(&self) -> usize {
        self.episode_count
    }
}

/// Groups episodes into shows.
///
/// Shows are ordered by sort name (case-insensitive), seasons by season
/// number, episodes by episode number. Ties keep their input order.
///
/// The partition keys on the display name, so two shows that share a
/// display name but not a sort name are merged into a single `Show`.
pub fn group_into_shows(mut episodes: Vec<EpisodeRecord>) -> Vec<Show> {
    let episode_total = episodes.len();
    episodes.sort_by_cached_key(|e| {
        (
            e.show_sort_name.to_lowercase(),
            e.season_number,
            e.episode_number,
        )
    });

    let mut buckets: Vec<(String, Vec<EpisodeRecord>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for episode in episodes {
        if let Some(&position) = positions.get(&episode.show_name) {
            buckets[position].1.push(episode);
        } else {
            positions.insert(episode.show_name.clone(), buckets.len());
            buckets.push((episode.show_name.clone(), vec![episode]));
        }
    }

    let shows: Vec<Show> = buckets
        .into_iter()
        .map(|(name, episodes)| Show::from_episodes(name, episodes))
        .collect();

    tracing::debug!(
        episodes = episode_total,
        shows = shows.len(),
        "grouped episodes into shows"
    );
    shows
}

/// Flattens shows back into episode records, in canonical order.
pub fn flatten(shows: &[Show]) -> Vec<EpisodeRecord> {
    shows
        .iter()
        .flat_map(|show| show.seasons.iter())
        .flat_map(|season| season.episodes.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn added() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 16, 0, 0).unwrap()
    }

    fn ep(show: &str, season: u32, episode: u32, name: &str) -> EpisodeRecord {
        EpisodeRecord::new(show, season, episode, name, added()).unwrap()
    }

    fn ep_sorted(show: &str, sort: &str, season: u32, episode: u32) -> EpisodeRecord {
        ep(show, season, episode, &format!("S{season}E{episode}")).with_show_sort_name(sort)
    }

    /// (show, season, episode) triples in output order.
    fn layout(shows: &[Show]) -> Vec<(String, u32, u32)> {
        flatten(shows)
            .into_iter()
            .map(|e| (e.show_name, e.season_number, e.episode_number))
            .collect()
    }

    fn sample() -> Vec<EpisodeRecord> {
        vec![
            ep_sorted("The Office", "Office, The", 2, 1),
            ep_sorted("Andor", "Andor", 1, 3),
            ep_sorted("The Office", "Office, The", 1, 2),
            ep_sorted("Andor", "Andor", 1, 1),
            ep_sorted("Severance", "Severance", 10, 1),
            ep_sorted("The Office", "Office, The", 1, 1),
            ep_sorted("Severance", "Severance", 9, 1),
            ep_sorted("Andor", "Andor", 1, 2),
        ]
    }

    #[test]
    fn test_empty_input_yields_no_shows() {
        assert!(group_into_shows(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_episode_yields_one_show_one_season() {
        let shows = group_into_shows(vec![ep("Foo", 1, 1, "Pilot")]);

        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].show_name(), "Foo");
        assert_eq!(shows[0].episode_count(), 1);
        assert_eq!(shows[0].seasons().len(), 1);
        assert_eq!(shows[0].seasons()[0].episodes().len(), 1);
        assert_eq!(shows[0].seasons()[0].episodes()[0].episode_name, "Pilot");
    }

    #[test]
    fn test_out_of_order_episodes_are_sorted() {
        let shows = group_into_shows(vec![ep("Bar", 1, 2, "Second"), ep("Bar", 1, 1, "First")]);

        let names: Vec<_> = shows[0].seasons()[0]
            .episodes()
            .iter()
            .map(|e| e.episode_name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_shows_ordered_by_sort_name_seasons_numerically() {
        let shows = group_into_shows(sample());

        let names: Vec<_> = shows.iter().map(Show::show_name).collect();
        assert_eq!(names, vec!["Andor", "The Office", "Severance"]);

        let severance: Vec<_> = shows[2].seasons().iter().map(Season::season_number).collect();
        assert_eq!(severance, vec![9, 10]);

        assert_eq!(
            layout(&shows),
            vec![
                ("Andor".to_string(), 1, 1),
                ("Andor".to_string(), 1, 2),
                ("Andor".to_string(), 1, 3),
                ("The Office".to_string(), 1, 1),
                ("The Office".to_string(), 1, 2),
                ("The Office".to_string(), 2, 1),
                ("Severance".to_string(), 9, 1),
                ("Severance".to_string(), 10, 1),
            ]
        );
    }

    #[test]
    fn test_sort_name_comparison_ignores_case() {
        let shows = group_into_shows(vec![
            ep_sorted("beta", "beta", 1, 1),
            ep_sorted("Alpha", "Alpha", 1, 1),
            ep_sorted("gamma", "gamma", 1, 1),
        ]);

        let names: Vec<_> = shows.iter().map(Show::show_name).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_grouping_is_permutation_invariant() {
        let expected = group_into_shows(sample());

        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(group_into_shows(reversed), expected);

        for shift in 1..sample().len() {
            let mut rotated = sample();
            rotated.rotate_left(shift);
            assert_eq!(group_into_shows(rotated), expected, "rotation by {shift}");
        }
    }

    #[test]
    fn test_counts_match_contents() {
        for show in group_into_shows(sample()) {
            let season_total: usize = show.seasons().iter().map(Season::episode_count).sum();
            assert_eq!(show.episode_count(), season_total);
            for season in show.seasons() {
                assert_eq!(season.episode_count(), season.episodes().len());
                assert_eq!(season.show_name(), show.show_name());
            }
        }
    }

    #[test]
    fn test_grouping_flattened_output_is_idempotent() {
        let once = group_into_shows(sample());
        let twice = group_into_shows(flatten(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let shows = group_into_shows(vec![
            ep("Foo", 1, 1, "first copy"),
            ep("Foo", 1, 1, "second copy"),
        ]);

        let names: Vec<_> = shows[0].seasons()[0]
            .episodes()
            .iter()
            .map(|e| e.episode_name.as_str())
            .collect();
        assert_eq!(names, vec!["first copy", "second copy"]);
    }

    // Two different shows sharing a display name collapse into one Show.
    // This mirrors the long-standing behavior and is pinned here on purpose.
    #[test]
    fn test_shared_display_name_merges_distinct_shows() {
        let shows = group_into_shows(vec![
            ep_sorted("Shameless", "Shameless (UK)", 2, 1),
            ep_sorted("Middle", "Middle", 1, 1),
            ep_sorted("Shameless", "Shameless (US)", 1, 1),
            ep_sorted("Shameless", "Shameless (UK)", 1, 5),
        ]);

        let names: Vec<_> = shows.iter().map(Show::show_name).collect();
        assert_eq!(names, vec!["Middle", "Shameless"]);

        let merged = &shows[1];
        assert_eq!(merged.episode_count(), 3);
        let seasons: Vec<_> = merged.seasons().iter().map(Season::season_number).collect();
        assert_eq!(seasons, vec![1, 2]);
        assert_eq!(merged.seasons()[0].episode_count(), 2);
    }

    #[test]
    fn test_grouping_does_not_interpret_names() {
        let shows = group_into_shows(vec![ep("進撃の巨人", 1, 1, "二千年後の君へ")]);
        assert_eq!(shows[0].show_name(), "進撃の巨人");
        assert_eq!(
            shows[0].seasons()[0].episodes()[0].episode_name,
            "二千年後の君へ"
        );
    }
}
