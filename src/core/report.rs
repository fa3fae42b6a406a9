use crate::core::aggregation::UNKNOWN_SENTIMENT;
use crate::core::portal::Dashboard;
use crate::domain::model::{FeedbackListing, FeedbackRecord};
use crate::domain::ports::Storage;
use crate::utils::error::{PortalError, Result};
use std::fmt::Write as _;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "dashboard.json",
            ExportFormat::Csv => "dashboard.csv",
        }
    }
}

fn write_record(out: &mut String, record: &FeedbackRecord, indent: &str) {
    let sentiment = record
        .sentiment
        .as_ref()
        .map(|s| s.label())
        .unwrap_or(UNKNOWN_SENTIMENT);
    let _ = writeln!(out, "{}- Content: {}", indent, record.content);
    let _ = writeln!(out, "{}  Sentiment: {}", indent, sentiment);
    let _ = writeln!(out, "{}  Department: {}", indent, record.department.as_deref().unwrap_or(""));
    let _ = writeln!(out, "{}  User: {}", indent, record.username);
}

fn write_chart<'a>(out: &mut String, title: &str, rows: impl Iterator<Item = (&'a str, usize)>) {
    let rows: Vec<(&str, usize)> = rows.collect();
    let _ = writeln!(out, "{}:", title);
    if rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }

    let label_width = rows.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(1).max(1);
    for (name, count) in rows {
        let bar = (count * BAR_WIDTH / max).max(1);
        let _ = writeln!(
            out,
            "  {:<width$} {} {}",
            name,
            "█".repeat(bar),
            count,
            width = label_width
        );
    }
}

/// Text version of the dashboard page: header, list (or grouped list) and
/// the two charts.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome, {} ({})", dashboard.username, dashboard.role);
    let _ = writeln!(out);
    let _ = writeln!(out, "Feedback List:");

    if dashboard.listing.is_empty() {
        let _ = writeln!(out, "No feedbacks available.");
    } else {
        match &dashboard.listing {
            FeedbackListing::Grouped(groups) => {
                for group in groups {
                    let _ = writeln!(out, "Department: {}", group.department);
                    for record in &group.feedbacks {
                        write_record(&mut out, record, "  ");
                    }
                }
            }
            FeedbackListing::Flat(records) => {
                for record in records {
                    write_record(&mut out, record, "");
                }
            }
        }
    }

    let _ = writeln!(out);
    write_chart(
        &mut out,
        "Sentiment",
        dashboard
            .aggregates
            .sentiments
            .iter()
            .map(|s| (s.name.as_str(), s.value)),
    );
    let _ = writeln!(out);
    write_chart(
        &mut out,
        "Departments",
        dashboard
            .aggregates
            .departments
            .iter()
            .map(|d| (d.name.as_str(), d.count)),
    );
    out
}

/// One row per feedback record, groups flattened.
pub fn dashboard_csv(dashboard: &Dashboard) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "content", "sentiment", "department", "username", "submitted_at"])?;

    for record in dashboard.listing.records() {
        writer.write_record([
            record.id.map(|id| id.to_string()).unwrap_or_default(),
            record.content.clone(),
            record
                .sentiment
                .as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| UNKNOWN_SENTIMENT.to_string()),
            record.department.clone().unwrap_or_default(),
            record.username.clone(),
            record
                .submitted_at
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| PortalError::IoError(e.into_error()))
}

pub struct DashboardExporter<S: Storage> {
    storage: S,
    output_path: String,
}

impl<S: Storage> DashboardExporter<S> {
    pub fn new(storage: S, output_path: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
        }
    }

    /// Writes the dashboard and returns where it went.
    pub async fn export(&self, dashboard: &Dashboard, format: ExportFormat) -> Result<String> {
        let data = match format {
            ExportFormat::Json => serde_json::to_vec_pretty(dashboard)?,
            ExportFormat::Csv => dashboard_csv(dashboard)?,
        };

        let file_name = format.file_name();
        tracing::debug!("Writing {} ({} bytes) to storage", file_name, data.len());
        self.storage.write_file(file_name, &data).await?;

        Ok(format!("{}/{}", self.output_path, file_name))
    }
}
