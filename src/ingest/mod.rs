pub mod tags;

use crate::error::{MotiveError, Result};
use crate::types::observation::{Observation, RawTags};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Observations loaded for one run plus the digest of the bytes they came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    pub digest: String,
}

/// Record shape written by the collection pipeline. Merged exports carry
/// `playtime_forever` in minutes and up to three game names: `name_x` from
/// the owned-games listing, `name_y` from store metadata and `name` from the
/// completion-time lookup.
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    participant_id: String,
    appid: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    name_x: Option<String>,
    #[serde(default)]
    name_y: Option<String>,
    #[serde(default)]
    playtime_hours: Option<f64>,
    #[serde(default)]
    playtime_forever: Option<f64>,
    #[serde(default)]
    achievement_ratio: Option<f64>,
    #[serde(default)]
    genres: RawTags,
    #[serde(default)]
    categories: RawTags,
    #[serde(default)]
    hltb_main_story: Option<f64>,
    #[serde(default)]
    hltb_main_extra: Option<f64>,
    #[serde(default)]
    hltb_completionist: Option<f64>,
}

impl ObservationRecord {
    fn into_observation(self) -> Observation {
        let playtime_hours = self
            .playtime_hours
            .or_else(|| self.playtime_forever.map(minutes_to_hours))
            .filter(|hours| hours.is_finite())
            .map(|hours| hours.max(0.0))
            .unwrap_or(0.0);
        let achievement_ratio = self
            .achievement_ratio
            .filter(|ratio| ratio.is_finite())
            .map(|ratio| ratio.clamp(0.0, 1.0));

        Observation {
            participant_id: self.participant_id,
            appid: self.appid,
            name: self.name_x.or(self.name_y).or(self.name),
            playtime_hours,
            achievement_ratio,
            genres: self.genres,
            categories: self.categories,
            hltb_main_story: finite(self.hltb_main_story),
            hltb_main_extra: finite(self.hltb_main_extra),
            hltb_completionist: finite(self.hltb_completionist),
        }
    }
}

/// Hours to one decimal, halves rounded to even like the exports' own rounding.
fn minutes_to_hours(minutes: f64) -> f64 {
    (minutes / 60.0 * 10.0).round_ties_even() / 10.0
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Loads a `.json` / `.jsonl` file, or every such file below a directory.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(MotiveError::DatasetNotFound(path.display().to_string()));
    }

    let files = dataset_files(path);
    let mut hasher = Sha256::new();
    let mut records = Vec::new();
    for file in &files {
        let bytes = std::fs::read(file)?;
        hasher.update(&bytes);
        let parsed = parse_records(file, &bytes)?;
        tracing::debug!(file = %file.display(), records = parsed.len(), "read dataset file");
        records.extend(parsed);
    }

    let total = records.len();
    let observations = dedup(records.into_iter().map(ObservationRecord::into_observation));
    if observations.is_empty() {
        return Err(MotiveError::EmptyDataset(path.display().to_string()));
    }
    if observations.len() < total {
        tracing::info!(
            dropped = total - observations.len(),
            "dropped duplicate (appid, participant_id) rows"
        );
    }
    tracing::info!(
        files = files.len(),
        observations = observations.len(),
        "dataset loaded"
    );

    Ok(Dataset {
        observations,
        digest: format!("{:x}", hasher.finalize()),
    })
}

/// Directory holding `motive.toml` for a dataset path.
pub fn config_root(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn dataset_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|file| matches!(extension(file).as_deref(), Some("json" | "jsonl")))
        .collect()
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

fn parse_records(path: &Path, bytes: &[u8]) -> Result<Vec<ObservationRecord>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| MotiveError::DatasetParse(format!("{}: {}", path.display(), e)))?;

    if extension(path).as_deref() == Some("jsonl") {
        return text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    MotiveError::DatasetParse(format!("{}:{}: {}", path.display(), index + 1, e))
                })
            })
            .collect();
    }

    serde_json::from_str(text)
        .map_err(|e| MotiveError::DatasetParse(format!("{}: {}", path.display(), e)))
}

/// Keeps the first row for every `(appid, participant_id)` pair.
fn dedup(observations: impl Iterator<Item = Observation>) -> Vec<Observation> {
    let mut seen = HashSet::new();
    observations
        .filter(|observation| seen.insert((observation.appid, observation.participant_id.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_dataset_reads_json_array_and_normalizes_numbers() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("games.json");
        fs::write(
            &path,
            r#"[
  {"participant_id": "alice", "appid": 10, "name_x": "Counter-Strike",
   "playtime_forever": 125, "achievement_ratio": 1.7,
   "genres": "['Action']", "categories": "Multi-player, PvP"},
  {"participant_id": "alice", "appid": 20, "playtime_hours": -3.0,
   "genres": ["RPG"], "categories": null, "hltb_main_story": 12.5}
]"#,
        )
        .expect("dataset should write");

        let dataset = load_dataset(&path).expect("dataset should load");
        assert_eq!(dataset.observations.len(), 2);
        assert_eq!(dataset.digest.len(), 64);

        let first = &dataset.observations[0];
        assert_eq!(first.name.as_deref(), Some("Counter-Strike"));
        assert_eq!(first.playtime_hours, 2.1);
        assert_eq!(first.achievement_ratio, Some(1.0));

        let second = &dataset.observations[1];
        assert_eq!(second.playtime_hours, 0.0);
        assert_eq!(second.achievement_ratio, None);
        assert_eq!(second.categories, RawTags::Absent);
        assert_eq!(second.hltb_main_story, Some(12.5));
    }

    #[test]
    fn load_dataset_accepts_merged_export_columns() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("steam_data.json");
        fs::write(
            &path,
            r#"[
  {"appid": 400, "name_x": "Portal", "playtime_forever": 75, "participant_id": "alice",
   "name_y": "Portal", "genres": "['Puzzle']", "categories": "['Single-player']",
   "achievement_ratio": 0.4, "name": "Portal", "hltb_main_story": 3.0,
   "hltb_main_extra": 4.5, "hltb_completionist": 10.5},
  {"appid": 570, "name_x": null, "playtime_forever": 15, "participant_id": "alice",
   "name_y": "Dota 2", "genres": null, "categories": null, "name": null}
]"#,
        )
        .expect("dataset should write");

        let dataset = load_dataset(&path).expect("merged export should load");
        let portal = &dataset.observations[0];
        assert_eq!(portal.name.as_deref(), Some("Portal"));
        assert_eq!(portal.playtime_hours, 1.2);
        assert_eq!(portal.hltb_completionist, Some(10.5));
        let dota = &dataset.observations[1];
        assert_eq!(dota.name.as_deref(), Some("Dota 2"));
        assert_eq!(dota.playtime_hours, 0.2);
    }

    #[test]
    fn minutes_round_half_to_even() {
        assert_eq!(minutes_to_hours(15.0), 0.2);
        assert_eq!(minutes_to_hours(45.0), 0.8);
        assert_eq!(minutes_to_hours(75.0), 1.2);
        assert_eq!(minutes_to_hours(125.0), 2.1);
    }

    #[test]
    fn load_dataset_walks_directories_and_dedups() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"participant_id\": \"bob\", \"appid\": 1, \"playtime_hours\": 4.0}\n\n\
             {\"participant_id\": \"bob\", \"appid\": 1, \"playtime_hours\": 9.0}\n",
        )
        .expect("jsonl should write");
        fs::write(
            dir.path().join("b.json"),
            r#"[{"participant_id": "carol", "appid": 1, "playtime_hours": 1.0}]"#,
        )
        .expect("json should write");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("notes should write");

        let dataset = load_dataset(dir.path()).expect("dataset should load");
        assert_eq!(dataset.observations.len(), 2);
        assert_eq!(dataset.observations[0].participant_id, "bob");
        assert_eq!(dataset.observations[0].playtime_hours, 4.0);
        assert_eq!(dataset.observations[1].participant_id, "carol");
    }

    #[test]
    fn load_dataset_reports_line_of_bad_jsonl_record() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"participant_id\": \"bob\", \"appid\": 1}\n{\"appid\": 2}\n")
            .expect("jsonl should write");

        let error = load_dataset(&path).expect_err("missing participant should fail");
        assert!(matches!(error, MotiveError::DatasetParse(message) if message.contains("bad.jsonl:2")));
    }

    #[test]
    fn load_dataset_rejects_missing_and_empty_inputs() {
        let dir = TempDir::new().expect("temp dir should be created");
        assert!(matches!(
            load_dataset(&dir.path().join("absent.json")),
            Err(MotiveError::DatasetNotFound(_))
        ));

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "[]").expect("empty dataset should write");
        assert!(matches!(
            load_dataset(&empty),
            Err(MotiveError::EmptyDataset(_))
        ));
    }

    #[test]
    fn config_root_uses_dataset_directory() {
        assert_eq!(config_root(Path::new("games.json")), PathBuf::from("."));
        assert_eq!(
            config_root(Path::new("data/games.json")),
            PathBuf::from("data")
        );
    }
}
