pub mod compass;
pub mod normalize;

use crate::ingest::tags::observation_tags;
use crate::lexicon::{Lexicon, LexiconRegistry};
use crate::types::observation::Observation;
use crate::types::profile::{ProfileTable, ScoreVector, Taxonomy};

/// Points one observation contributes to each dimension of `lexicon`.
///
/// Each dimension takes at most one keyword match per row: the first of its
/// keywords found inside any tag adds the row's playtime, scaled by the
/// achievement ratio for the achievement dimension. A tag may still feed
/// several different dimensions.
pub fn score_row(observation: &Observation, lexicon: &Lexicon) -> ScoreVector {
    let mut scores = lexicon.zero_vector();
    let weight = observation.playtime_hours.max(0.0);
    let achieve = observation.achievement_ratio.unwrap_or(0.0);
    let tags = observation_tags(observation);

    for (index, dimension) in lexicon.dimensions().iter().enumerate() {
        if dimension.first_match(&tags).is_none() {
            continue;
        }
        let points = if dimension.is_achievement_scaled() {
            weight * achieve
        } else {
            weight
        };
        scores.add_at(index, points);
    }

    scores
}

/// Sums row scores per participant, in input order.
pub fn aggregate(observations: &[Observation], lexicon: &Lexicon) -> ProfileTable {
    let mut table = ProfileTable::new(lexicon.taxonomy(), lexicon.dimension_names());
    for observation in observations {
        let row = score_row(observation, lexicon);
        table.accumulate(&observation.participant_id, &row);
    }
    table
}

#[derive(Debug, Clone)]
pub struct Profiles {
    pub yee: ProfileTable,
    pub bartle: ProfileTable,
}

impl Profiles {
    pub fn get(&self, taxonomy: Taxonomy) -> &ProfileTable {
        match taxonomy {
            Taxonomy::Yee => &self.yee,
            Taxonomy::Bartle => &self.bartle,
        }
    }
}

pub fn compute_profiles(observations: &[Observation], registry: &LexiconRegistry) -> Profiles {
    let yee = aggregate(observations, registry.get(Taxonomy::Yee));
    let bartle = aggregate(observations, registry.get(Taxonomy::Bartle));
    tracing::info!(users = yee.len(), "computed motivation profiles");
    Profiles { yee, bartle }
}
