pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ExportDirectory, FileSessionStore, HttpFeedbackApi};
pub use config::toml_config::PortalConfig;
pub use crate::core::{
    aggregation::{build_aggregates, FeedbackAggregates},
    portal::{Dashboard, Portal},
    report::{render_dashboard, DashboardExporter, ExportFormat},
};
pub use utils::error::{PortalError, Result};
