use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Tone of a feedback entry as classified by the portal backend.
///
/// The backend only ever sends `Positive`, `Negative` or `Neutral`, but any
/// other label is kept verbatim so it still shows up in the charts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl Sentiment {
    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Other(label) => label,
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            _ => Sentiment::Other(label),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(label: &str) -> Self {
        Sentiment::from(label.to_string())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.label().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub username: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FeedbackRecord {
    /// Department label if the record carries a non-blank one.
    pub fn department_label(&self) -> Option<&str> {
        self.department
            .as_deref()
            .filter(|department| !department.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentGroup {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub department: String,
    #[serde(default)]
    pub feedbacks: Vec<FeedbackRecord>,
}

/// What `GET /api/Feedback/all` returns: administrators get the feedback
/// grouped by department, everyone else gets their own flat list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "items", rename_all = "lowercase")]
pub enum FeedbackListing {
    Flat(Vec<FeedbackRecord>),
    Grouped(Vec<DepartmentGroup>),
}

impl FeedbackListing {
    /// All records in display order, groups flattened in group order.
    pub fn records(&self) -> Box<dyn Iterator<Item = &FeedbackRecord> + '_> {
        match self {
            FeedbackListing::Flat(records) => Box::new(records.iter()),
            FeedbackListing::Grouped(groups) => {
                Box::new(groups.iter().flat_map(|group| group.feedbacks.iter()))
            }
        }
    }

    pub fn total(&self) -> usize {
        match self {
            FeedbackListing::Flat(records) => records.len(),
            FeedbackListing::Grouped(groups) => groups.iter().map(|g| g.feedbacks.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FeedbackListing::Flat(records) => records.is_empty(),
            FeedbackListing::Grouped(groups) => groups.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl From<String> for Role {
    // 後端只有 "Admin" 會看到分組資料，其餘一律視為一般使用者
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated context handed to every call that needs the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub username: String,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub const REDACTED: &str = "<redacted>";

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSubmission {
    pub content: String,
}

/// Raw login payload; every field is optional so a partial body can be
/// reported as an invalid response instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

// 欄位型別不對時當作缺值，不讓單筆壞資料拖垮整份清單
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.filter(|label| !label.trim().is_empty()))
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_i64())
}

fn deserialize_sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_label(deserializer)?.map(Sentiment::from))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?
        .as_deref()
        .and_then(parse_timestamp))
}

/// RFC 3339 first, then an offset-less ISO-8601 timestamp read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_record_from_camel_case_json() {
        let record: FeedbackRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "content": "Canteen food is great",
            "sentiment": "Positive",
            "department": "HR",
            "username": "alice",
            "submittedAt": "2025-03-01T10:15:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, Some(7));
        assert_eq!(record.sentiment, Some(Sentiment::Positive));
        assert_eq!(record.department_label(), Some("HR"));
        assert_eq!(
            record.submitted_at.unwrap().to_rfc3339(),
            "2025-03-01T10:15:00+00:00"
        );
    }

    #[test]
    fn test_feedback_record_tolerates_missing_fields() {
        let record: FeedbackRecord =
            serde_json::from_value(serde_json::json!({ "content": "hi" })).unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.sentiment, None);
        assert_eq!(record.department_label(), None);
        assert_eq!(record.username, "");
        assert_eq!(record.submitted_at, None);
    }

    #[test]
    fn test_null_and_blank_fields_are_absent() {
        let record: FeedbackRecord = serde_json::from_value(serde_json::json!({
            "sentiment": null,
            "department": "  ",
            "submittedAt": "not a date"
        }))
        .unwrap();

        assert_eq!(record.sentiment, None);
        assert_eq!(record.department_label(), None);
        assert_eq!(record.submitted_at, None);
    }

    #[test]
    fn test_wrongly_typed_fields_become_absent() {
        let record: FeedbackRecord = serde_json::from_value(serde_json::json!({
            "id": "seven",
            "content": 42,
            "sentiment": 0,
            "department": {"name": "HR"},
            "username": null,
            "submittedAt": 1717243200
        }))
        .unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.content, "");
        assert_eq!(record.sentiment, None);
        assert_eq!(record.department, None);
        assert_eq!(record.username, "");
        assert_eq!(record.submitted_at, None);

        let group: DepartmentGroup = serde_json::from_value(serde_json::json!({
            "department": 12,
            "feedbacks": [{"id": 1, "sentiment": "Positive"}]
        }))
        .unwrap();
        assert_eq!(group.department, "");
        assert_eq!(group.feedbacks.len(), 1);
    }

    #[test]
    fn test_debug_output_hides_passwords() {
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let registration = Registration {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            role: Role::Admin,
        };

        let printed = format!("{:?} {:?}", credentials, registration);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("alice"));
        assert!(printed.contains(REDACTED));
    }

    #[test]
    fn test_unknown_sentiment_label_is_preserved() {
        assert_eq!(Sentiment::from("negative"), Sentiment::Negative);
        assert_eq!(
            Sentiment::from("Mixed"),
            Sentiment::Other("Mixed".to_string())
        );
        assert_eq!(Sentiment::from("Mixed").label(), "Mixed");
    }

    #[test]
    fn test_naive_timestamp_is_read_as_utc() {
        let parsed = parse_timestamp("2025-03-01T10:15:00.1234567").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2025-03-01 10:15");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from("Admin".to_string()), Role::Admin);
        assert_eq!(Role::from("admin".to_string()), Role::Admin);
        assert_eq!(Role::from("User".to_string()), Role::User);
        assert_eq!(Role::from("Manager".to_string()), Role::User);
    }

    #[test]
    fn test_grouped_listing_flattens_in_group_order() {
        let record = |content: &str| FeedbackRecord {
            content: content.to_string(),
            ..Default::default()
        };
        let listing = FeedbackListing::Grouped(vec![
            DepartmentGroup {
                department: "HR".to_string(),
                feedbacks: vec![record("a"), record("b")],
            },
            DepartmentGroup {
                department: "IT".to_string(),
                feedbacks: vec![record("c")],
            },
        ]);

        let contents: Vec<&str> = listing.records().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(listing.total(), 3);
        assert!(!listing.is_empty());
    }
}
