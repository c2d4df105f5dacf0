use crate::error::{MotiveError, Result};
use crate::types::observation::UserId;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxonomy {
    Yee,
    Bartle,
}

impl Taxonomy {
    pub fn title(self) -> &'static str {
        match self {
            Self::Yee => "Yee",
            Self::Bartle => "Bartle",
        }
    }
}

/// Per-dimension points, kept in lexicon declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreVector {
    entries: Vec<(String, f64)>,
}

impl ScoreVector {
    pub fn zeroed<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: dimensions
                .into_iter()
                .map(|name| (name.into(), 0.0))
                .collect(),
        }
    }

    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, value)| *value)
    }

    pub fn add_at(&mut self, index: usize, amount: f64) {
        if let Some((_, value)) = self.entries.get_mut(index) {
            *value += amount;
        }
    }

    /// Element-wise sum. Both vectors must come from the same lexicon.
    pub fn accumulate(&mut self, other: &ScoreVector) {
        for ((name, value), (other_name, other_value)) in
            self.entries.iter_mut().zip(other.entries.iter())
        {
            debug_assert_eq!(name, other_name);
            *value += *other_value;
        }
    }

    pub fn scaled(&self, factor: f64) -> ScoreVector {
        ScoreVector {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), value * factor))
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, value)| *value)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for ScoreVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One score vector per participant for a single taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTable {
    taxonomy: Taxonomy,
    dimensions: Vec<String>,
    profiles: BTreeMap<UserId, ScoreVector>,
}

impl ProfileTable {
    pub fn new(taxonomy: Taxonomy, dimensions: Vec<String>) -> Self {
        Self {
            taxonomy,
            dimensions,
            profiles: BTreeMap::new(),
        }
    }

    pub fn taxonomy(&self) -> Taxonomy {
        self.taxonomy
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Looks up one participant. A missing participant is an error, never
    /// an all-zero profile.
    pub fn get(&self, user: &str) -> Result<&ScoreVector> {
        self.profiles
            .get(user)
            .ok_or_else(|| MotiveError::UnknownUser(user.to_string()))
    }

    pub fn accumulate(&mut self, user: &str, row: &ScoreVector) {
        let dimensions = &self.dimensions;
        self.profiles
            .entry(user.to_string())
            .or_insert_with(|| ScoreVector::zeroed(dimensions.iter().cloned()))
            .accumulate(row);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoreVector)> {
        self.profiles
            .iter()
            .map(|(user, scores)| (user.as_str(), scores))
    }

    #[cfg(test)]
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
