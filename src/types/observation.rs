use serde::{Deserialize, Serialize};

pub type UserId = String;

/// A genre or category field as it arrives from the ingestion stage.
///
/// Upstream tooling has written these fields as JSON arrays, as
/// bracketed string literals (`"['Action', 'Indie']"`) and as plain
/// comma-separated strings. Anything else lands in `Malformed` and is
/// later treated as "no tags" rather than failing the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    Text(String),
    #[default]
    Absent,
    Malformed(serde_json::Value),
}

#[cfg(test)]
impl RawTags {
    pub fn list<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(tags.into_iter().map(Into::into).collect())
    }
}

/// One user/game playtime record, the atomic scoring unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    pub participant_id: UserId,
    pub appid: u64,
    pub name: Option<String>,
    pub playtime_hours: f64,
    pub achievement_ratio: Option<f64>,
    pub genres: RawTags,
    pub categories: RawTags,
    pub hltb_main_story: Option<f64>,
    pub hltb_main_extra: Option<f64>,
    pub hltb_completionist: Option<f64>,
}

impl Observation {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("app {}", self.appid),
        }
    }

    pub fn is_played(&self) -> bool {
        self.playtime_hours > 0.0
    }
}
