use crate::insight::group::GroupSummary;
use crate::insight::library::{LibraryReport, TagInventory};
use crate::insight::user_stats::UserStats;
use crate::scoring::compass::Compass;
use crate::scoring::normalize::{RadarProfile, TaxonomySummary};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub version: String,
    pub generated_at: String,
    pub project: Option<String>,
    pub dataset_sha256: String,
    pub observations: usize,
}

impl ReportMeta {
    pub fn new(project: Option<String>, dataset_sha256: String, observations: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
            project,
            dataset_sha256,
            observations,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReportBody {
    Profiles(Vec<TaxonomySummary>),
    Radar(RadarProfile),
    Compass(Compass),
    Stats(Vec<UserStats>),
    Library(LibraryReport),
    Explore(GroupSummary),
    Tags(TagInventory),
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub body: ReportBody,
}

impl Report {
    /// True when the report carries something the caller should look at:
    /// users without any matched tag, or libraries without genre data.
    pub fn has_warnings(&self) -> bool {
        match &self.body {
            ReportBody::Profiles(summaries) => summaries
                .iter()
                .any(|summary| summary.users_without_signal().next().is_some()),
            ReportBody::Radar(radar) => radar.player.is_none(),
            ReportBody::Library(library) => !library.issues.is_empty(),
            ReportBody::Compass(_)
            | ReportBody::Stats(_)
            | ReportBody::Explore(_)
            | ReportBody::Tags(_) => false,
        }
    }
}
