pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::report::ExportFormat;
#[cfg(feature = "cli")]
use crate::domain::model::{Role, REDACTED};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fmt;
#[cfg(feature = "cli")]
use toml_config::PortalConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "feedback-portal")]
#[command(about = "Command-line client for the Smart Feedback Portal")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Portal API base URL (overrides config)")]
    pub api_url: Option<String>,

    #[arg(long, global = true, help = "Where the login session is kept")]
    pub session_file: Option<String>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Clone, Subcommand)]
pub enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, ignore_case = true, default_value_t = RoleArg::User)]
        role: RoleArg,
    },
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Submit a piece of feedback
    Submit {
        #[arg(long)]
        content: String,
    },
    /// Show the feedback list and charts
    Dashboard {
        #[arg(long, value_enum, default_value_t = DashboardFormat::Text)]
        format: DashboardFormat,

        #[arg(long, help = "Output directory for json/csv exports")]
        output: Option<String>,
    },
}

// 密碼不能出現在日誌裡
#[cfg(feature = "cli")]
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Register { username, role, .. } => f
                .debug_struct("Register")
                .field("username", username)
                .field("password", &REDACTED)
                .field("role", role)
                .finish(),
            Command::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &REDACTED)
                .finish(),
            Command::Logout => f.write_str("Logout"),
            Command::Submit { content } => f.debug_struct("Submit").field("content", content).finish(),
            Command::Dashboard { format, output } => f
                .debug_struct("Dashboard")
                .field("format", format)
                .field("output", output)
                .finish(),
        }
    }
}

/// Roles a new account may ask for. Anything else is rejected by the parser.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    User,
    Admin,
}

#[cfg(feature = "cli")]
impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DashboardFormat {
    Text,
    Json,
    Csv,
}

#[cfg(feature = "cli")]
impl DashboardFormat {
    /// `None` means print to the terminal.
    pub fn export_format(&self) -> Option<ExportFormat> {
        match self {
            DashboardFormat::Text => None,
            DashboardFormat::Json => Some(ExportFormat::Json),
            DashboardFormat::Csv => Some(ExportFormat::Csv),
        }
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Config file (or defaults) with command-line overrides applied on top.
    pub fn resolve(&self) -> Result<PortalConfig> {
        let mut config = match &self.config {
            Some(path) => PortalConfig::from_file(path)?,
            None => PortalConfig::default(),
        };

        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.clone();
        }
        if let Some(session_file) = &self.session_file {
            config.session.path = session_file.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_seconds = Some(timeout);
        }
        if let Command::Dashboard {
            output: Some(output),
            ..
        } = &self.command
        {
            config.export.output_path = output.clone();
        }

        Ok(config)
    }
}
