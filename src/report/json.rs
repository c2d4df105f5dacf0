use crate::types::report::Report;

pub fn to_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconRegistry;
    use crate::scoring::{compute_profiles, normalize::summarize};
    use crate::types::observation::{Observation, RawTags};
    use crate::types::report::{ReportBody, ReportMeta};

    #[test]
    fn json_report_is_tagged_and_keeps_dimension_order() {
        let rows = vec![Observation {
            participant_id: "alice".to_string(),
            appid: 1,
            playtime_hours: 10.0,
            genres: RawTags::list(["Action", "Indie"]),
            ..Default::default()
        }];
        let profiles = compute_profiles(&rows, &LexiconRegistry::builtin());
        let report = Report {
            meta: ReportMeta::new(None, "abc".to_string(), rows.len()),
            body: ReportBody::Profiles(vec![summarize(&profiles.yee)]),
        };

        let rendered = to_json(&report).expect("json should serialize");
        assert!(rendered.contains("\"kind\": \"profiles\""));
        assert!(rendered.contains("\"dataset_sha256\": \"abc\""));
        let action = rendered.find("\"Action\"").expect("action present");
        let strategy = rendered.find("\"Strategy\"").expect("strategy present");
        assert!(action < strategy);
    }
}
