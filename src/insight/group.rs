use crate::ingest::tags::normalize_tags;
use crate::stats;
use crate::types::config::ReportSettings;
use crate::types::observation::{Observation, RawTags};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Completion-time estimates are compared only inside these bounds.
const MAX_ESTIMATE_HOURS: f64 = 100.0;
const MAX_PLAYTIME_HOURS: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub label: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispersion {
    pub std_dev: f64,
    pub coefficient_of_variation: Option<f64>,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub iqr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionComparison {
    pub pairs: usize,
    pub mean_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub total_rows: usize,
    pub unique_games: usize,
    pub shared_games: usize,
    pub participants: usize,
    pub top_genres: Vec<Ranked>,
    pub top_categories: Vec<Ranked>,
    pub top_games: Vec<Ranked>,
    pub mean_playtime: Option<f64>,
    pub mean_played_playtime: Option<f64>,
    pub zero_hour_rows: usize,
    pub unique_played_games: usize,
    pub unique_unplayed_games: usize,
    pub dispersion: Option<Dispersion>,
    pub rows_without_genres: usize,
    pub rows_without_categories: usize,
    pub completion: CompletionComparison,
}

impl GroupSummary {
    pub fn most_played_genre(&self) -> Option<&str> {
        self.top_genres.first().map(|entry| entry.label.as_str())
    }

    pub fn most_played_category(&self) -> Option<&str> {
        self.top_categories.first().map(|entry| entry.label.as_str())
    }
}

pub fn group_summary(observations: &[Observation], settings: &ReportSettings) -> GroupSummary {
    let all_games = observations
        .iter()
        .map(|observation| observation.appid)
        .collect::<HashSet<_>>();
    let played_games = observations
        .iter()
        .filter(|observation| observation.is_played())
        .map(|observation| observation.appid)
        .collect::<HashSet<_>>();
    let participants = observations
        .iter()
        .map(|observation| observation.participant_id.as_str())
        .collect::<HashSet<_>>();

    let all_hours = observations
        .iter()
        .map(|observation| observation.playtime_hours)
        .collect::<Vec<_>>();
    let played_hours = all_hours
        .iter()
        .copied()
        .filter(|hours| *hours > 0.0)
        .collect::<Vec<_>>();

    GroupSummary {
        total_rows: observations.len(),
        unique_games: all_games.len(),
        shared_games: observations.len() - all_games.len(),
        participants: participants.len(),
        top_genres: hours_by_tag(observations, |o| &o.genres, settings.group_top),
        top_categories: hours_by_tag(observations, |o| &o.categories, settings.group_top),
        top_games: hours_by_game(observations, settings.group_top),
        mean_playtime: stats::mean(&all_hours),
        mean_played_playtime: stats::mean(&played_hours),
        zero_hour_rows: all_hours.len() - played_hours.len(),
        unique_played_games: played_games.len(),
        unique_unplayed_games: all_games.difference(&played_games).count(),
        dispersion: dispersion(&played_hours),
        rows_without_genres: count_untagged(observations, |o| &o.genres),
        rows_without_categories: count_untagged(observations, |o| &o.categories),
        completion: completion_comparison(observations),
    }
}

fn hours_by_tag(
    observations: &[Observation],
    field: impl Fn(&Observation) -> &RawTags,
    limit: usize,
) -> Vec<Ranked> {
    let mut hours: BTreeMap<String, f64> = BTreeMap::new();
    for observation in observations {
        for tag in normalize_tags(field(observation)) {
            *hours.entry(tag).or_default() += observation.playtime_hours;
        }
    }
    rank_hours(hours, limit)
}

fn hours_by_game(observations: &[Observation], limit: usize) -> Vec<Ranked> {
    let mut hours: BTreeMap<String, f64> = BTreeMap::new();
    for observation in observations {
        *hours.entry(observation.display_name()).or_default() += observation.playtime_hours;
    }
    rank_hours(hours, limit)
}

fn rank_hours(hours: BTreeMap<String, f64>, limit: usize) -> Vec<Ranked> {
    let mut ranked = hours
        .into_iter()
        .map(|(label, hours)| Ranked { label, hours })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    ranked.truncate(limit);
    ranked
}

fn count_untagged(observations: &[Observation], field: impl Fn(&Observation) -> &RawTags) -> usize {
    observations
        .iter()
        .filter(|observation| normalize_tags(field(observation)).is_empty())
        .count()
}

fn dispersion(played_hours: &[f64]) -> Option<Dispersion> {
    let std_dev = stats::sample_std_dev(played_hours)?;
    let mean = stats::mean(played_hours)?;
    let p25 = stats::quantile(played_hours, 0.25)?;
    let p75 = stats::quantile(played_hours, 0.75)?;
    Some(Dispersion {
        std_dev,
        coefficient_of_variation: (mean != 0.0).then(|| std_dev / mean),
        p25,
        p50: stats::quantile(played_hours, 0.5)?,
        p75,
        p90: stats::quantile(played_hours, 0.9)?,
        iqr: p75 - p25,
    })
}

/// Played hours against the main-story estimate, for games that were
/// played and have a plausible estimate.
fn completion_comparison(observations: &[Observation]) -> CompletionComparison {
    let ratios = observations
        .iter()
        .filter_map(|observation| {
            let estimate = observation.hltb_main_story?;
            let played = observation.playtime_hours;
            let in_range = estimate > 0.0
                && estimate <= MAX_ESTIMATE_HOURS
                && played > 0.0
                && played <= MAX_PLAYTIME_HOURS;
            in_range.then(|| played / estimate)
        })
        .collect::<Vec<_>>();

    CompletionComparison {
        pairs: ratios.len(),
        mean_ratio: stats::mean(&ratios),
    }
}
