use crate::domain::model::{DepartmentCount, FeedbackListing, SentimentCount};
use serde::Serialize;
use std::collections::HashMap;

/// Bucket for records whose sentiment is missing.
pub const UNKNOWN_SENTIMENT: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackAggregates {
    pub sentiments: Vec<SentimentCount>,
    pub departments: Vec<DepartmentCount>,
}

/// Count per key, emitted in first-seen order.
#[derive(Debug, Default)]
struct GroupCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl GroupCounter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn into_entries(self) -> Vec<(String, usize)> {
        self.entries
    }
}

/// Builds the sentiment and department tables behind the dashboard charts.
///
/// Grouped listings are flattened in group order first. Every record counts
/// towards the sentiment table (missing sentiment lands in
/// [`UNKNOWN_SENTIMENT`]); only records with a non-blank department count
/// towards the department table.
pub fn build_aggregates(listing: &FeedbackListing) -> FeedbackAggregates {
    let mut sentiments = GroupCounter::default();
    let mut departments = GroupCounter::default();

    for record in listing.records() {
        let label = record
            .sentiment
            .as_ref()
            .map(|s| s.label())
            .unwrap_or(UNKNOWN_SENTIMENT);
        sentiments.add(label);

        if let Some(department) = record.department_label() {
            departments.add(department);
        }
    }

    FeedbackAggregates {
        sentiments: sentiments
            .into_entries()
            .into_iter()
            .map(|(name, value)| SentimentCount { name, value })
            .collect(),
        departments: departments
            .into_entries()
            .into_iter()
            .map(|(name, count)| DepartmentCount { name, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DepartmentGroup, FeedbackRecord, Sentiment};

    fn record(sentiment: Option<&str>, department: Option<&str>) -> FeedbackRecord {
        FeedbackRecord {
            sentiment: sentiment.map(Sentiment::from),
            department: department.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let listing = FeedbackListing::Flat(vec![
            record(Some("Positive"), Some("HR")),
            record(Some("Positive"), Some("IT")),
            record(Some("Negative"), Some("HR")),
        ]);

        let result = build_aggregates(&listing);

        assert_eq!(
            result.sentiments,
            vec![
                SentimentCount { name: "Positive".to_string(), value: 2 },
                SentimentCount { name: "Negative".to_string(), value: 1 },
            ]
        );
        assert_eq!(
            result.departments,
            vec![
                DepartmentCount { name: "HR".to_string(), count: 2 },
                DepartmentCount { name: "IT".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(
            build_aggregates(&FeedbackListing::Flat(vec![])),
            FeedbackAggregates::default()
        );
        assert_eq!(
            build_aggregates(&FeedbackListing::Grouped(vec![])),
            FeedbackAggregates::default()
        );
    }

    #[test]
    fn test_missing_sentiment_counts_as_unknown() {
        let listing = FeedbackListing::Flat(vec![
            record(None, Some("HR")),
            record(Some("Neutral"), None),
            record(None, Some("")),
        ]);

        let result = build_aggregates(&listing);

        assert_eq!(result.sentiments[0].name, UNKNOWN_SENTIMENT);
        assert_eq!(result.sentiments[0].value, 2);
        assert_eq!(result.sentiments[1].name, "Neutral");
        assert_eq!(result.departments.len(), 1);
        assert_eq!(result.departments[0].count, 1);
    }

    #[test]
    fn test_grouped_matches_flat() {
        let a = record(Some("Positive"), Some("HR"));
        let b = record(Some("Negative"), Some("HR"));
        let c = record(Some("Positive"), Some("IT"));

        let grouped = FeedbackListing::Grouped(vec![
            DepartmentGroup {
                department: "HR".to_string(),
                feedbacks: vec![a.clone(), b.clone()],
            },
            DepartmentGroup {
                department: "IT".to_string(),
                feedbacks: vec![c.clone()],
            },
        ]);
        let flat = FeedbackListing::Flat(vec![a, b, c]);

        assert_eq!(build_aggregates(&grouped), build_aggregates(&flat));
    }

    #[test]
    fn test_totals_match_record_counts() {
        let sentiments = ["Positive", "Negative", "Neutral", "Mixed"];
        let departments = [Some("HR"), None, Some("IT"), Some(" "), Some("Sales")];
        let records: Vec<FeedbackRecord> = (0..23)
            .map(|i| {
                record(
                    (i % 5 != 0).then(|| sentiments[i % sentiments.len()]),
                    departments[i % departments.len()],
                )
            })
            .collect();
        let with_department = records
            .iter()
            .filter(|r| r.department_label().is_some())
            .count();
        let listing = FeedbackListing::Flat(records);

        let result = build_aggregates(&listing);

        let sentiment_total: usize = result.sentiments.iter().map(|s| s.value).sum();
        let department_total: usize = result.departments.iter().map(|d| d.count).sum();
        assert_eq!(sentiment_total, 23);
        assert_eq!(department_total, with_department);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let listing = FeedbackListing::Flat(vec![
            record(Some("Neutral"), Some("Ops")),
            record(Some("Positive"), Some("HR")),
            record(Some("Neutral"), Some("HR")),
        ]);

        assert_eq!(build_aggregates(&listing), build_aggregates(&listing));
    }
}
