use feedback_portal::build_aggregates;
use feedback_portal::core::{DepartmentGroup, FeedbackListing, FeedbackRecord};

fn records_from(value: serde_json::Value) -> Vec<FeedbackRecord> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_documented_example() {
    let records = records_from(serde_json::json!([
        {"sentiment": "Positive", "department": "HR"},
        {"sentiment": "Positive", "department": "IT"},
        {"sentiment": "Negative", "department": "HR"}
    ]));

    let result = build_aggregates(&FeedbackListing::Flat(records));

    assert_eq!(
        serde_json::to_value(&result.sentiments).unwrap(),
        serde_json::json!([{"name": "Positive", "value": 2}, {"name": "Negative", "value": 1}])
    );
    assert_eq!(
        serde_json::to_value(&result.departments).unwrap(),
        serde_json::json!([{"name": "HR", "count": 2}, {"name": "IT", "count": 1}])
    );
}

#[test]
fn test_records_with_missing_fields_keep_totals() {
    let records = records_from(serde_json::json!([
        {"sentiment": "Neutral", "department": "Ops"},
        {"department": "Ops"},
        {"sentiment": "Neutral"},
        {"sentiment": null, "department": null},
        {"sentiment": "Positive", "department": ""}
    ]));
    let total = records.len();

    let result = build_aggregates(&FeedbackListing::Flat(records));

    let sentiment_total: usize = result.sentiments.iter().map(|s| s.value).sum();
    let department_total: usize = result.departments.iter().map(|d| d.count).sum();
    assert_eq!(sentiment_total, total);
    assert_eq!(department_total, 2);
    assert_eq!(result.sentiments[1].name, "Unknown");
    assert_eq!(result.sentiments[1].value, 2);
}

#[test]
fn test_grouped_payload_matches_flattened_payload() {
    let groups: Vec<DepartmentGroup> = serde_json::from_value(serde_json::json!([
        {"department": "HR", "feedbacks": [
            {"id": 1, "sentiment": "Negative", "department": "HR"},
            {"id": 2, "sentiment": "Positive", "department": "HR"}
        ]},
        {"department": "IT", "feedbacks": [
            {"id": 3, "sentiment": "Positive", "department": "IT"}
        ]},
        {"department": "Empty"}
    ]))
    .unwrap();
    let flat: Vec<FeedbackRecord> = groups.iter().flat_map(|g| g.feedbacks.clone()).collect();

    let grouped_result = build_aggregates(&FeedbackListing::Grouped(groups));
    let flat_result = build_aggregates(&FeedbackListing::Flat(flat));

    assert_eq!(grouped_result, flat_result);
    assert_eq!(grouped_result.sentiments[0].name, "Negative");
}

#[test]
fn test_unrecognised_sentiment_gets_its_own_bucket() {
    let records = records_from(serde_json::json!([
        {"sentiment": "Mixed", "department": "HR"},
        {"sentiment": "positive", "department": "HR"},
        {"sentiment": "Mixed", "department": "HR"}
    ]));

    let result = build_aggregates(&FeedbackListing::Flat(records));

    assert_eq!(result.sentiments.len(), 2);
    assert_eq!(result.sentiments[0].name, "Mixed");
    assert_eq!(result.sentiments[0].value, 2);
    assert_eq!(result.sentiments[1].name, "Positive");
}
