use crate::error::Result;
use crate::types::profile::{ProfileTable, ScoreVector, Taxonomy};
use serde::Serialize;

/// Divides a vector by its own sum. `None` means the user has no signal:
/// nothing ever matched, so proportions are undefined.
pub fn l1_normalize(scores: &ScoreVector) -> Option<ScoreVector> {
    let total = scores.total();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(scores.scaled(1.0 / total))
}

/// Mean of the normalized vectors of every user that has signal.
pub fn group_mean(table: &ProfileTable) -> Option<ScoreVector> {
    let mut sum = ScoreVector::zeroed(table.dimensions().iter().cloned());
    let mut count = 0usize;
    for (_, scores) in table.iter() {
        if let Some(normalized) = l1_normalize(scores) {
            sum.accumulate(&normalized);
            count += 1;
        }
    }
    (count > 0).then(|| sum.scaled(1.0 / count as f64))
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user: String,
    pub raw: ScoreVector,
    pub normalized: Option<ScoreVector>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomySummary {
    pub taxonomy: Taxonomy,
    pub dimensions: Vec<String>,
    pub users: Vec<UserProfile>,
    pub group_mean: Option<ScoreVector>,
}

impl TaxonomySummary {
    pub fn users_without_signal(&self) -> impl Iterator<Item = &str> {
        self.users
            .iter()
            .filter(|profile| profile.normalized.is_none())
            .map(|profile| profile.user.as_str())
    }
}

pub fn summarize(table: &ProfileTable) -> TaxonomySummary {
    let users = table
        .iter()
        .map(|(user, scores)| UserProfile {
            user: user.to_string(),
            raw: scores.clone(),
            normalized: l1_normalize(scores),
        })
        .collect();

    TaxonomySummary {
        taxonomy: table.taxonomy(),
        dimensions: table.dimensions().to_vec(),
        users,
        group_mean: group_mean(table),
    }
}

/// One participant's proportions next to the group average.
#[derive(Debug, Clone, Serialize)]
pub struct RadarProfile {
    pub user: String,
    pub taxonomy: Taxonomy,
    pub dimensions: Vec<String>,
    pub player: Option<ScoreVector>,
    pub group_mean: Option<ScoreVector>,
}

pub fn radar(table: &ProfileTable, user: &str) -> Result<RadarProfile> {
    let scores = table.get(user)?;
    Ok(RadarProfile {
        user: user.to_string(),
        taxonomy: table.taxonomy(),
        dimensions: table.dimensions().to_vec(),
        player: l1_normalize(scores),
        group_mean: group_mean(table),
    })
}
