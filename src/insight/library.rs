use super::{by_user, rank_counts, TagCount};
use crate::ingest::tags::normalize_tags;
use crate::types::config::ReportSettings;
use crate::types::observation::Observation;
use serde::Serialize;
use std::collections::BTreeMap;

const MAX_NAME_CHARS: usize = 30;
const SHORT_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameEntry {
    pub appid: u64,
    pub name: String,
    pub playtime_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLibrary {
    pub user: String,
    pub top_games: Vec<GameEntry>,
    /// Genre frequency among `top_games`.
    pub dominant_genres: Vec<TagCount>,
    /// Genre frequency across the whole library.
    pub genre_histogram: Vec<TagCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryIssue {
    NoGenreData,
}

impl LibraryIssue {
    pub fn describe(self) -> &'static str {
        match self {
            Self::NoGenreData => "no genre data in library",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserIssue {
    pub user: String,
    pub issue: LibraryIssue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryReport {
    pub users: Vec<UserLibrary>,
    pub issues: Vec<UserIssue>,
}

pub fn library_report(observations: &[Observation], settings: &ReportSettings) -> LibraryReport {
    let mut users = Vec::new();
    let mut issues = Vec::new();

    for (user, games) in by_user(observations) {
        let mut ranked = games.clone();
        // Stable sort keeps input order between equal playtimes.
        ranked.sort_by(|a, b| b.playtime_hours.total_cmp(&a.playtime_hours));
        ranked.truncate(settings.top_games);

        let top_games = ranked
            .iter()
            .map(|game| GameEntry {
                appid: game.appid,
                name: shorten_name(&game.display_name()),
                playtime_hours: game.playtime_hours,
            })
            .collect();
        let dominant_genres = rank_counts(genre_counts(&ranked), settings.top_genres);
        let genre_histogram = rank_counts(genre_counts(&games), settings.histogram_genres);

        if genre_histogram.is_empty() {
            tracing::debug!(user, "library has no genre data");
            issues.push(UserIssue {
                user: user.to_string(),
                issue: LibraryIssue::NoGenreData,
            });
        }

        users.push(UserLibrary {
            user: user.to_string(),
            top_games,
            dominant_genres,
            genre_histogram,
        });
    }

    LibraryReport { users, issues }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagInventory {
    pub genres: Vec<TagCount>,
    pub categories: Vec<TagCount>,
}

/// Every normalized genre and category seen in the dataset, sorted by tag.
pub fn tag_inventory(observations: &[Observation]) -> TagInventory {
    let mut genres: BTreeMap<String, usize> = BTreeMap::new();
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for observation in observations {
        for tag in normalize_tags(&observation.genres) {
            *genres.entry(tag).or_default() += 1;
        }
        for tag in normalize_tags(&observation.categories) {
            *categories.entry(tag).or_default() += 1;
        }
    }

    let into_counts = |counts: BTreeMap<String, usize>| -> Vec<TagCount> {
        counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect()
    };
    TagInventory {
        genres: into_counts(genres),
        categories: into_counts(categories),
    }
}

fn genre_counts(games: &[&Observation]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for game in games {
        for tag in normalize_tags(&game.genres) {
            *counts.entry(tag).or_default() += 1;
        }
    }
    counts
}

fn shorten_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let prefix = name.chars().take(SHORT_NAME_CHARS).collect::<String>();
        format!("{prefix}...")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::RawTags;

    fn game(user: &str, appid: u64, name: &str, hours: f64, genres: &str) -> Observation {
        Observation {
            participant_id: user.to_string(),
            appid,
            name: Some(name.to_string()),
            playtime_hours: hours,
            genres: RawTags::Text(genres.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn top_games_are_ranked_by_playtime_and_truncated() {
        let rows = vec![
            game("alice", 1, "Short", 1.0, "['Casual']"),
            game("alice", 2, "Long", 50.0, "['RPG', 'Action']"),
            game("alice", 3, "Middle", 8.0, "['Action']"),
        ];
        let settings = ReportSettings {
            top_games: 2,
            ..ReportSettings::default()
        };

        let report = library_report(&rows, &settings);
        let alice = &report.users[0];
        let names = alice
            .top_games
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Long", "Middle"]);
        assert_eq!(
            alice.dominant_genres[0],
            TagCount {
                tag: "action".to_string(),
                count: 2
            }
        );
        assert_eq!(alice.genre_histogram.len(), 3);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn long_names_are_shortened() {
        assert_eq!(
            shorten_name("The Elder Scrolls V: Skyrim Special Edition"),
            "The Elder Scrolls V:..."
        );
        assert_eq!(shorten_name("Portal 2"), "Portal 2");
    }

    #[test]
    fn users_without_genres_are_reported_as_issues() {
        let rows = vec![game("bob", 1, "Mystery", 3.0, "")];
        let report = library_report(&rows, &ReportSettings::default());
        assert_eq!(report.users.len(), 1);
        assert_eq!(
            report.issues,
            vec![UserIssue {
                user: "bob".to_string(),
                issue: LibraryIssue::NoGenreData
            }]
        );
    }

    #[test]
    fn tag_inventory_lists_normalized_tags() {
        let rows = vec![
            Observation {
                categories: RawTags::Text("Single-player, Steam Achievements".to_string()),
                ..game("alice", 1, "A", 1.0, "['Action', 'Indie']")
            },
            game("bob", 2, "B", 1.0, "['ACTION']"),
        ];

        let inventory = tag_inventory(&rows);
        assert_eq!(
            inventory.genres,
            vec![
                TagCount {
                    tag: "action".to_string(),
                    count: 2
                },
                TagCount {
                    tag: "indie".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(inventory.categories.len(), 2);
    }
}
