pub mod group;
pub mod library;
pub mod user_stats;

use crate::types::observation::Observation;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Observations grouped per participant, users in sorted order.
pub fn by_user(observations: &[Observation]) -> BTreeMap<&str, Vec<&Observation>> {
    let mut groups: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for observation in observations {
        groups
            .entry(observation.participant_id.as_str())
            .or_default()
            .push(observation);
    }
    groups
}

/// Highest counts first; ties broken alphabetically.
pub fn rank_counts(counts: BTreeMap<String, usize>, limit: usize) -> Vec<TagCount> {
    let mut ranked = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_counts_orders_by_count_then_tag() {
        let counts = BTreeMap::from([
            ("rpg".to_string(), 2),
            ("action".to_string(), 5),
            ("indie".to_string(), 2),
            ("casual".to_string(), 1),
        ]);

        let ranked = rank_counts(counts, 3);
        let tags = ranked.iter().map(|entry| entry.tag.as_str()).collect::<Vec<_>>();
        assert_eq!(tags, vec!["action", "indie", "rpg"]);
    }

    #[test]
    fn by_user_groups_in_sorted_order() {
        let rows = vec![
            Observation {
                participant_id: "zoe".to_string(),
                ..Default::default()
            },
            Observation {
                participant_id: "alice".to_string(),
                appid: 1,
                ..Default::default()
            },
            Observation {
                participant_id: "alice".to_string(),
                appid: 2,
                ..Default::default()
            },
        ];

        let groups = by_user(&rows);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["alice", "zoe"]);
        assert_eq!(groups["alice"].len(), 2);
    }
}
