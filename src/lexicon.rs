//! Keyword lexicons mapping store tags to motivation dimensions.
//!
//! Keyword phrases cover the localized tag spellings the store returns
//! for participants whose client language is not English, which is why a
//! single dimension carries several translations of the same tag.

use crate::error::{MotiveError, Result};
use crate::types::config::{DimensionConfig, MotiveConfig};
use crate::types::profile::{ScoreVector, Taxonomy};
use std::collections::HashSet;
use std::sync::OnceLock;

type StaticTable = &'static [(&'static str, &'static [&'static str])];

const YEE_TABLE: StaticTable = &[
    ("Action", &["action", "ação", "экшены", "azione", "动作", "액션"]),
    (
        "Immersion",
        &[
            "rpg",
            "adventure",
            "aventura",
            "приключенческие игры",
            "gdr",
            "ролевые игры",
            "어드벤처",
        ],
    ),
    (
        "Social",
        &[
            "multi-player",
            "multijogador",
            "online co-op",
            "кооператив",
            "co-op",
            "multigiocatore",
            "для нескольких игроков",
            "多人",
            "멀티플레이어",
            "协同作战",
            "远程同乐",
        ],
    ),
    (
        "Achievement",
        &[
            "steam achievements",
            "conquistas steam",
            "достижения steam",
            "achievement di steam",
            "logros de steam",
            "steam 도전 과제",
        ],
    ),
    (
        "Creativity",
        &[
            "simulation",
            "sandbox",
            "game development",
            "includes level editor",
            "inclui editor de níveis",
            "includes source sdk",
            "incluye editor de niveles",
            "incluye el sdk de source",
            "workshop di steam",
            "steam 창작마당",
            "게임 개발",
            "设计和插画",
        ],
    ),
    (
        "Strategy",
        &["strategy", "стратегии", "simulação", "management", "strategia"],
    ),
];

const BARTLE_TABLE: StaticTable = &[
    (
        "Killer",
        &[
            "pvp",
            "jvj",
            "lan pvp",
            "pvp in lan",
            "shooter",
            "battle royale",
            "competitive",
            "игрок против игрока",
            "pvp online",
            "玩家对战",
            "线上玩家对战",
        ],
    ),
    (
        "Achiever",
        &[
            "steam achievements",
            "difficult",
            "story rich",
            "достижения steam",
            "logros de steam",
            "achievement di steam",
            "steam 도전 과제",
        ],
    ),
    (
        "Explorer",
        &[
            "adventure",
            "open world",
            "exploration",
            "приключенческие игры",
            "simulazione",
            "어드벤처",
        ],
    ),
    (
        "Socializer",
        &[
            "multi-player",
            "online co-op",
            "co-op",
            "shared/split screen",
            "remote play together",
            "кооператив",
            "multijogador",
            "multigiocatore",
            "для нескольких игроков",
            "멀티플레이어",
            "远程同乐",
            "协同作战",
        ],
    ),
];

/// Dimension names whose points are scaled by the achievement ratio.
const ACHIEVEMENT_DIMENSIONS: [&str; 2] = ["achievement", "achiever"];

#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    keywords: Vec<String>,
    achievement_scaled: bool,
}

impl Dimension {
    fn new(name: &str, keywords: Vec<String>) -> Self {
        let name = name.trim().to_string();
        let achievement_scaled = ACHIEVEMENT_DIMENSIONS.contains(&name.to_lowercase().as_str());
        Self {
            name,
            keywords,
            achievement_scaled,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_achievement_scaled(&self) -> bool {
        self.achievement_scaled
    }

    /// First keyword, in declaration order, contained in any of `tags`.
    pub fn first_match<'a>(&'a self, tags: &[String]) -> Option<&'a str> {
        self.keywords
            .iter()
            .find(|keyword| tags.iter().any(|tag| tag.contains(keyword.as_str())))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    taxonomy: Taxonomy,
    dimensions: Vec<Dimension>,
}

impl Lexicon {
    pub fn new<'a, I>(taxonomy: Taxonomy, table: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
    {
        let mut seen = HashSet::new();
        let mut dimensions = Vec::new();
        for (name, keywords) in table {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(MotiveError::InvalidLexicon(
                    "dimension name must not be empty".to_string(),
                ));
            }
            if !seen.insert(trimmed.to_lowercase()) {
                return Err(MotiveError::InvalidLexicon(format!(
                    "duplicate dimension: {trimmed}"
                )));
            }

            let keywords = keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .collect::<Vec<_>>();
            if keywords.is_empty() || keywords.iter().any(String::is_empty) {
                return Err(MotiveError::InvalidLexicon(format!(
                    "dimension {trimmed} needs at least one non-empty keyword"
                )));
            }
            dimensions.push(Dimension::new(trimmed, keywords));
        }

        if dimensions.is_empty() {
            return Err(MotiveError::InvalidLexicon(format!(
                "{} lexicon has no dimensions",
                taxonomy.title()
            )));
        }

        Ok(Self {
            taxonomy,
            dimensions,
        })
    }

    pub fn from_config(taxonomy: Taxonomy, dimensions: &[DimensionConfig]) -> Result<Self> {
        Self::new(
            taxonomy,
            dimensions.iter().map(|dimension| {
                (
                    dimension.name.as_str(),
                    dimension
                        .keywords
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>(),
                )
            }),
        )
    }

    pub fn builtin(taxonomy: Taxonomy) -> Self {
        let table = match taxonomy {
            Taxonomy::Yee => YEE_TABLE,
            Taxonomy::Bartle => BARTLE_TABLE,
        };
        Self {
            taxonomy,
            dimensions: table
                .iter()
                .map(|(name, keywords)| {
                    Dimension::new(name, keywords.iter().map(|k| k.to_lowercase()).collect())
                })
                .collect(),
        }
    }

    pub fn taxonomy(&self) -> Taxonomy {
        self.taxonomy
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions
            .iter()
            .map(|dimension| dimension.name.clone())
            .collect()
    }

    pub fn zero_vector(&self) -> ScoreVector {
        ScoreVector::zeroed(self.dimensions.iter().map(|dimension| dimension.name.as_str()))
    }
}

/// The pair of lexicons used for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconRegistry {
    yee: Lexicon,
    bartle: Lexicon,
}

impl LexiconRegistry {
    pub fn builtin() -> Self {
        Self {
            yee: Lexicon::builtin(Taxonomy::Yee),
            bartle: Lexicon::builtin(Taxonomy::Bartle),
        }
    }

    pub fn from_config(config: Option<&MotiveConfig>) -> Result<Self> {
        let resolve = |taxonomy: Taxonomy| -> Result<Lexicon> {
            match config.and_then(|cfg| cfg.lexicon_override(taxonomy)) {
                Some(dimensions) => {
                    tracing::info!(
                        taxonomy = taxonomy.title(),
                        dimensions = dimensions.len(),
                        "using configured lexicon"
                    );
                    Lexicon::from_config(taxonomy, dimensions)
                }
                None => Ok(Lexicon::builtin(taxonomy)),
            }
        };
        Ok(Self {
            yee: resolve(Taxonomy::Yee)?,
            bartle: resolve(Taxonomy::Bartle)?,
        })
    }

    pub fn get(&self, taxonomy: Taxonomy) -> &Lexicon {
        match taxonomy {
            Taxonomy::Yee => &self.yee,
            Taxonomy::Bartle => &self.bartle,
        }
    }
}

static REGISTRY: OnceLock<LexiconRegistry> = OnceLock::new();

/// Installs the process-wide lexicons. Only the first call takes effect;
/// the registry is read-only afterwards.
pub fn install(registry: LexiconRegistry) -> &'static LexiconRegistry {
    if REGISTRY.set(registry).is_err() {
        tracing::warn!("lexicon registry already installed; keeping the existing one");
    }
    REGISTRY.get_or_init(LexiconRegistry::builtin)
}
