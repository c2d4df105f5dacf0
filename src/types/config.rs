use crate::error::MotiveError;
use crate::lexicon::Lexicon;
use crate::types::profile::Taxonomy;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotiveConfig {
    pub project: Option<ProjectConfig>,
    pub lexicons: Option<LexiconsConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: Option<String>,
}

/// Replacement keyword tables. Arrays of tables keep their declaration
/// order, which becomes the dimension order of the lexicon.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconsConfig {
    pub yee: Option<Vec<DimensionConfig>>,
    pub bartle: Option<Vec<DimensionConfig>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionConfig {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    pub top_games: Option<usize>,
    pub top_genres: Option<usize>,
    pub histogram_genres: Option<usize>,
    pub group_top: Option<usize>,
    pub compass_normalize: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub top_games: usize,
    pub top_genres: usize,
    pub histogram_genres: usize,
    pub group_top: usize,
    pub compass_normalize: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_games: 10,
            top_genres: 8,
            histogram_genres: 10,
            group_top: 10,
            compass_normalize: true,
        }
    }
}

/// Merges an optional section from a lower and a higher config layer.
fn overlay_section<T>(lower: Option<T>, upper: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (lower, upper) {
        (Some(lower), Some(upper)) => Some(merge(lower, upper)),
        (lower, upper) => upper.or(lower),
    }
}

impl ProjectConfig {
    fn overlay(self, upper: Self) -> Self {
        Self {
            name: upper.name.or(self.name),
        }
    }
}

impl LexiconsConfig {
    /// A taxonomy's table is replaced whole: dimensions never mix across
    /// layers.
    fn overlay(self, upper: Self) -> Self {
        Self {
            yee: upper.yee.or(self.yee),
            bartle: upper.bartle.or(self.bartle),
        }
    }
}

impl ReportConfig {
    fn overlay(self, upper: Self) -> Self {
        Self {
            top_games: upper.top_games.or(self.top_games),
            top_genres: upper.top_genres.or(self.top_genres),
            histogram_genres: upper.histogram_genres.or(self.histogram_genres),
            group_top: upper.group_top.or(self.group_top),
            compass_normalize: upper.compass_normalize.or(self.compass_normalize),
        }
    }
}

impl MotiveConfig {
    /// Applies `upper` on top of `self`, key by key.
    pub fn overlay(self, upper: MotiveConfig) -> MotiveConfig {
        MotiveConfig {
            project: overlay_section(self.project, upper.project, ProjectConfig::overlay),
            lexicons: overlay_section(self.lexicons, upper.lexicons, LexiconsConfig::overlay),
            report: overlay_section(self.report, upper.report, ReportConfig::overlay),
        }
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|project| project.name.as_deref())
    }

    pub fn lexicon_override(&self, taxonomy: Taxonomy) -> Option<&[DimensionConfig]> {
        let lexicons = self.lexicons.as_ref()?;
        match taxonomy {
            Taxonomy::Yee => lexicons.yee.as_deref(),
            Taxonomy::Bartle => lexicons.bartle.as_deref(),
        }
    }

    pub fn report_settings(&self) -> ReportSettings {
        let defaults = ReportSettings::default();
        match &self.report {
            Some(report) => ReportSettings {
                top_games: report.top_games.unwrap_or(defaults.top_games),
                top_genres: report.top_genres.unwrap_or(defaults.top_genres),
                histogram_genres: report.histogram_genres.unwrap_or(defaults.histogram_genres),
                group_top: report.group_top.unwrap_or(defaults.group_top),
                compass_normalize: report
                    .compass_normalize
                    .unwrap_or(defaults.compass_normalize),
            },
            None => defaults,
        }
    }

    pub fn validate(&self) -> Result<(), MotiveError> {
        for taxonomy in [Taxonomy::Yee, Taxonomy::Bartle] {
            if let Some(dimensions) = self.lexicon_override(taxonomy) {
                Lexicon::from_config(taxonomy, dimensions).map_err(|e| {
                    MotiveError::ConfigParse(format!(
                        "lexicons.{}: {}",
                        taxonomy.title().to_lowercase(),
                        e
                    ))
                })?;
            }
        }

        let settings = self.report_settings();
        let limits = [
            ("report.top_games", settings.top_games),
            ("report.top_genres", settings.top_genres),
            ("report.histogram_genres", settings.histogram_genres),
            ("report.group_top", settings.group_top),
        ];
        if let Some((key, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(MotiveError::ConfigParse(format!(
                "{key} must be greater than 0"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_settings_fall_back_to_defaults() {
        let config: MotiveConfig = toml::from_str(
            r#"
[report]
top_games = 5
"#,
        )
        .expect("config should parse");

        let settings = config.report_settings();
        assert_eq!(settings.top_games, 5);
        assert_eq!(settings.top_genres, 8);
        assert!(settings.compass_normalize);
    }

    #[test]
    fn lexicon_override_keeps_declaration_order() {
        let config: MotiveConfig = toml::from_str(
            r#"
[[lexicons.bartle]]
name = "Socializer"
keywords = ["co-op"]

[[lexicons.bartle]]
name = "Killer"
keywords = ["pvp"]
"#,
        )
        .expect("config should parse");

        let names = config
            .lexicon_override(Taxonomy::Bartle)
            .expect("bartle override should exist")
            .iter()
            .map(|dimension| dimension.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Socializer", "Killer"]);
        assert!(config.lexicon_override(Taxonomy::Yee).is_none());
    }

    #[test]
    fn overlay_replaces_keys_and_whole_lexicon_tables() {
        let lower: MotiveConfig = toml::from_str(
            r#"
[project]
name = "lower"

[report]
top_games = 3
group_top = 4

[[lexicons.yee]]
name = "Action"
keywords = ["action"]

[[lexicons.yee]]
name = "Puzzle"
keywords = ["puzzle"]

[[lexicons.bartle]]
name = "Killer"
keywords = ["pvp"]
"#,
        )
        .expect("lower layer should parse");
        let upper: MotiveConfig = toml::from_str(
            r#"
[report]
top_games = 6

[[lexicons.yee]]
name = "Calm"
keywords = ["casual"]
"#,
        )
        .expect("upper layer should parse");

        let merged = lower.overlay(upper);
        assert_eq!(merged.project_name(), Some("lower"));
        let settings = merged.report_settings();
        assert_eq!(settings.top_games, 6);
        assert_eq!(settings.group_top, 4);
        let yee = merged
            .lexicon_override(Taxonomy::Yee)
            .expect("yee override should exist");
        assert_eq!(yee.len(), 1);
        assert_eq!(yee[0].name, "Calm");
        assert!(merged.lexicon_override(Taxonomy::Bartle).is_some());
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let config: MotiveConfig = toml::from_str(
            r#"
[report]
top_genres = 0
"#,
        )
        .expect("config should parse");

        let error = config.validate().expect_err("zero limit should fail");
        assert!(error.to_string().contains("report.top_genres"));
    }

    #[test]
    fn validate_rejects_duplicate_dimensions() {
        let config: MotiveConfig = toml::from_str(
            r#"
[[lexicons.yee]]
name = "Action"
keywords = ["action"]

[[lexicons.yee]]
name = "action"
keywords = ["shooter"]
"#,
        )
        .expect("config should parse");

        let error = config.validate().expect_err("duplicate dimension should fail");
        assert!(matches!(error, MotiveError::ConfigParse(message) if message.contains("lexicons.yee")));
    }
}
