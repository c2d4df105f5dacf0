use crate::insight::group::{GroupSummary, Ranked};
use crate::insight::library::{LibraryReport, TagInventory};
use crate::insight::user_stats::UserStats;
use crate::insight::TagCount;
use crate::scoring::compass::Compass;
use crate::scoring::normalize::{RadarProfile, TaxonomySummary};
use crate::types::profile::ScoreVector;
use crate::types::report::{Report, ReportBody, ReportMeta};
use std::fmt::Write;

const NO_SIGNAL: &str = "no signal";

pub fn to_markdown(report: &Report) -> String {
    let mut output = String::new();
    match &report.body {
        ReportBody::Profiles(summaries) => {
            header(&mut output, "Motivation Profiles", &report.meta);
            for summary in summaries {
                profiles_section(&mut output, summary);
            }
        }
        ReportBody::Radar(radar) => {
            header(&mut output, "Gamer Motivation Profile", &report.meta);
            radar_section(&mut output, radar);
        }
        ReportBody::Compass(compass) => {
            header(&mut output, "Bartle Compass", &report.meta);
            compass_section(&mut output, compass);
        }
        ReportBody::Stats(stats) => {
            header(&mut output, "Player Statistics", &report.meta);
            stats_section(&mut output, stats);
        }
        ReportBody::Library(library) => {
            header(&mut output, "Player Libraries", &report.meta);
            library_section(&mut output, library);
        }
        ReportBody::Explore(summary) => {
            header(&mut output, "Group Exploration", &report.meta);
            explore_section(&mut output, summary);
        }
        ReportBody::Tags(inventory) => {
            header(&mut output, "Tag Inventory", &report.meta);
            tags_section(&mut output, inventory);
        }
    }
    output
}

fn header(output: &mut String, title: &str, meta: &ReportMeta) {
    let _ = writeln!(output, "# {title}\n");
    if let Some(project) = &meta.project {
        let _ = writeln!(output, "Project: {project}");
    }
    let _ = writeln!(
        output,
        "Dataset: {} observations (sha256 {})\n",
        meta.observations,
        short_digest(&meta.dataset_sha256)
    );
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn profiles_section(output: &mut String, summary: &TaxonomySummary) {
    let _ = writeln!(output, "## {}\n", summary.taxonomy.title());
    table_header(output, "user", &summary.dimensions);
    for profile in &summary.users {
        vector_row(output, &profile.user, Some(&profile.raw), summary.dimensions.len());
    }
    output.push('\n');

    let _ = writeln!(output, "### Normalized\n");
    table_header(output, "user", &summary.dimensions);
    for profile in &summary.users {
        vector_row(
            output,
            &profile.user,
            profile.normalized.as_ref(),
            summary.dimensions.len(),
        );
    }
    vector_row(
        output,
        "group mean",
        summary.group_mean.as_ref(),
        summary.dimensions.len(),
    );
    output.push('\n');
}

fn radar_section(output: &mut String, radar: &RadarProfile) {
    let _ = writeln!(output, "## {} ({})\n", radar.user, radar.taxonomy.title());
    let _ = writeln!(output, "| dimension | {} | group mean |", radar.user);
    output.push_str("|---|---|---|\n");
    for (index, dimension) in radar.dimensions.iter().enumerate() {
        let player = cell(radar.player.as_ref(), index);
        let mean = cell(radar.group_mean.as_ref(), index);
        let _ = writeln!(output, "| {dimension} | {player} | {mean} |");
    }
    if radar.player.is_none() {
        let _ = writeln!(output, "\n{}: {NO_SIGNAL}", radar.user);
    }
}

fn compass_section(output: &mut String, compass: &Compass) {
    let scale = if compass.normalized { "normalized" } else { "raw" };
    let _ = writeln!(
        output,
        "x = Killer - Socializer, y = Achiever - Explorer ({scale})\n"
    );
    output.push_str("| user | x | y | quadrant |\n|---|---|---|---|\n");
    for point in &compass.points {
        let _ = writeln!(
            output,
            "| {} | {:+.2} | {:+.2} | {} |",
            point.user,
            point.x,
            point.y,
            point.quadrant.label()
        );
    }

    output.push_str("\n## Group summary\n\n");
    for (axis, summary) in [("x", compass.x_axis), ("y", compass.y_axis)] {
        match summary {
            Some(summary) => {
                let _ = writeln!(
                    output,
                    "- {axis} axis: mean = {:+.2} | median = {:+.2}",
                    summary.mean, summary.median
                );
            }
            None => {
                let _ = writeln!(output, "- {axis} axis: no users");
            }
        }
    }
}

fn stats_section(output: &mut String, stats: &[UserStats]) {
    for user in stats {
        let _ = writeln!(output, "## {}\n", user.user);
        let _ = writeln!(output, "- games in library: {}", user.total_games);
        let _ = writeln!(output, "- games played: {}", user.played_games);
        let _ = writeln!(output, "- share played: {:.1}%", user.played_share * 100.0);
        let _ = writeln!(output, "- total playtime: {:.1} h", user.total_playtime);
        let _ = writeln!(output, "- mean playtime per game: {}", hours(user.mean_playtime));
        let _ = writeln!(output, "- median playtime: {}", hours(user.median_playtime));
        let _ = writeln!(
            output,
            "- mean achievement ratio (played games): {}\n",
            ratio(user.mean_achievement_ratio)
        );
    }
}

fn library_section(output: &mut String, library: &LibraryReport) {
    for user in &library.users {
        let _ = writeln!(output, "## {}\n", user.user);
        output.push_str("### Most played games\n\n");
        for (rank, game) in user.top_games.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} ({:.1}h)",
                rank + 1,
                game.name,
                game.playtime_hours
            );
        }
        output.push_str("\n### Dominant genres in most played games\n\n");
        tag_counts(output, &user.dominant_genres);
        output.push_str("\n### Genre distribution\n\n");
        tag_counts(output, &user.genre_histogram);
        output.push('\n');
    }

    if !library.issues.is_empty() {
        output.push_str("## Issues\n\n");
        for issue in &library.issues {
            let _ = writeln!(output, "- {}: {}", issue.user, issue.issue.describe());
        }
    }
}

fn explore_section(output: &mut String, summary: &GroupSummary) {
    output.push_str("## Overview\n\n");
    let _ = writeln!(output, "- total rows: {}", summary.total_rows);
    let _ = writeln!(output, "- unique games: {}", summary.unique_games);
    let _ = writeln!(output, "- shared games: {}", summary.shared_games);
    let _ = writeln!(output, "- participants: {}", summary.participants);
    let _ = writeln!(
        output,
        "- most played genre: {}",
        summary.most_played_genre().unwrap_or("none")
    );
    let _ = writeln!(
        output,
        "- most played category: {}",
        summary.most_played_category().unwrap_or("none")
    );
    let _ = writeln!(output, "- mean playtime per game: {}", hours(summary.mean_playtime));
    let _ = writeln!(
        output,
        "- mean playtime per played game: {}",
        hours(summary.mean_played_playtime)
    );
    let _ = writeln!(output, "- rows with 0 hours: {}", summary.zero_hour_rows);
    let _ = writeln!(output, "- unique games played: {}", summary.unique_played_games);
    let _ = writeln!(output, "- unique games never played: {}", summary.unique_unplayed_games);
    let _ = writeln!(output, "- rows without genres: {}", summary.rows_without_genres);
    let _ = writeln!(
        output,
        "- rows without categories: {}\n",
        summary.rows_without_categories
    );

    output.push_str("## Top genres by hours\n\n");
    ranked(output, &summary.top_genres);
    output.push_str("\n## Top categories by hours\n\n");
    ranked(output, &summary.top_categories);
    output.push_str("\n## Top games by hours\n\n");
    ranked(output, &summary.top_games);

    output.push_str("\n## Played hours dispersion\n\n");
    match &summary.dispersion {
        Some(dispersion) => {
            let _ = writeln!(output, "- standard deviation: {:.2} h", dispersion.std_dev);
            let _ = writeln!(
                output,
                "- coefficient of variation: {}",
                dispersion
                    .coefficient_of_variation
                    .map(|cv| format!("{cv:.2}"))
                    .unwrap_or_else(|| "n/a".to_string())
            );
            let _ = writeln!(output, "- P25: {:.2} h", dispersion.p25);
            let _ = writeln!(output, "- P50: {:.2} h", dispersion.p50);
            let _ = writeln!(output, "- P75: {:.2} h", dispersion.p75);
            let _ = writeln!(output, "- P90: {:.2} h", dispersion.p90);
            let _ = writeln!(output, "- IQR: {:.2} h", dispersion.iqr);
        }
        None => output.push_str("- not enough played games\n"),
    }

    output.push_str("\n## Playtime vs completion estimate\n\n");
    let _ = writeln!(output, "- comparable games: {}", summary.completion.pairs);
    let _ = writeln!(
        output,
        "- mean playtime / main story estimate: {}",
        summary
            .completion
            .mean_ratio
            .map(|value| format!("{value:.2}"))
            .unwrap_or_else(|| "n/a".to_string())
    );
}

fn tags_section(output: &mut String, inventory: &TagInventory) {
    output.push_str("## Genres\n\n");
    tag_counts(output, &inventory.genres);
    output.push_str("\n## Categories\n\n");
    tag_counts(output, &inventory.categories);
}

fn table_header(output: &mut String, first: &str, dimensions: &[String]) {
    let _ = writeln!(output, "| {first} | {} |", dimensions.join(" | "));
    let _ = writeln!(output, "|---|{}", "---|".repeat(dimensions.len()));
}

fn vector_row(output: &mut String, label: &str, scores: Option<&ScoreVector>, width: usize) {
    let cells = match scores {
        Some(scores) => scores
            .values()
            .map(|value| format!("{value:.2}"))
            .collect::<Vec<_>>(),
        None => vec![NO_SIGNAL.to_string(); width],
    };
    let _ = writeln!(output, "| {label} | {} |", cells.join(" | "));
}

fn cell(scores: Option<&ScoreVector>, index: usize) -> String {
    scores
        .and_then(|scores| scores.values().nth(index))
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

fn tag_counts(output: &mut String, counts: &[TagCount]) {
    if counts.is_empty() {
        output.push_str("- none\n");
        return;
    }
    for entry in counts {
        let _ = writeln!(output, "- {}: {}", entry.tag, entry.count);
    }
}

fn ranked(output: &mut String, entries: &[Ranked]) {
    if entries.is_empty() {
        output.push_str("- none\n");
        return;
    }
    for entry in entries {
        let _ = writeln!(output, "- {}: {:.1} h", entry.label, entry.hours);
    }
}

fn hours(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.1} h"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn ratio(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconRegistry;
    use crate::scoring::compute_profiles;
    use crate::scoring::normalize::{radar, summarize};
    use crate::types::observation::{Observation, RawTags};

    fn meta() -> ReportMeta {
        ReportMeta::new(Some("cohort".to_string()), "0123456789abcdef".to_string(), 2)
    }

    fn rows() -> Vec<Observation> {
        vec![
            Observation {
                participant_id: "alice".to_string(),
                appid: 1,
                playtime_hours: 10.0,
                genres: RawTags::list(["Action"]),
                ..Default::default()
            },
            Observation {
                participant_id: "zoe".to_string(),
                appid: 2,
                playtime_hours: 3.0,
                genres: RawTags::list(["Casual"]),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn profiles_markdown_marks_users_without_signal() {
        let profiles = compute_profiles(&rows(), &LexiconRegistry::builtin());
        let report = Report {
            meta: meta(),
            body: ReportBody::Profiles(vec![summarize(&profiles.yee)]),
        };

        let rendered = to_markdown(&report);
        assert!(rendered.contains("# Motivation Profiles"));
        assert!(rendered.contains("Project: cohort"));
        assert!(rendered.contains("sha256 0123456789ab)"));
        assert!(rendered.contains("| user | Action | Immersion | Social | Achievement | Creativity | Strategy |"));
        assert!(rendered.contains("| alice | 10.00 | 0.00 |"));
        assert!(rendered.contains("| zoe | no signal |"));
        assert!(rendered.contains("| group mean | 1.00 |"));
        assert!(report.has_warnings());
    }

    #[test]
    fn radar_markdown_lists_player_and_group_mean() {
        let profiles = compute_profiles(&rows(), &LexiconRegistry::builtin());
        let profile = radar(&profiles.yee, "alice").expect("alice exists");
        let report = Report {
            meta: meta(),
            body: ReportBody::Radar(profile),
        };

        let rendered = to_markdown(&report);
        assert!(rendered.contains("## alice (Yee)"));
        assert!(rendered.contains("| Action | 1.00 | 1.00 |"));
        assert!(!report.has_warnings());
    }
}
