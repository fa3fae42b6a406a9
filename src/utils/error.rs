use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Unauthorized (status 401)")]
    Unauthorized,

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("No active session")]
    NotLoggedIn,

    #[error("Invalid response from server: {message}")]
    InvalidResponse { message: String },

    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Request to {endpoint} failed with status {status}")]
    RequestFailed { endpoint: String, status: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Input,
    Configuration,
    Storage,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PortalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::Http(_) | PortalError::RequestFailed { .. } => ErrorCategory::Network,
            PortalError::InvalidCredentials
            | PortalError::Unauthorized
            | PortalError::NotLoggedIn => ErrorCategory::Authentication,
            PortalError::UsernameTaken
            | PortalError::BadRequest { .. }
            | PortalError::ValidationError { .. } => ErrorCategory::Input,
            PortalError::ConfigValidationError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PortalError::IoError(_) | PortalError::CsvError(_) => ErrorCategory::Storage,
            PortalError::SerializationError(_)
            | PortalError::InvalidResponse { .. }
            | PortalError::UnexpectedStatus { .. } => ErrorCategory::Server,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::InvalidCredentials => "⚠️ Invalid username or password.".to_string(),
            PortalError::UsernameTaken => {
                "⚠️ Username already exists. Try another one.".to_string()
            }
            PortalError::Unauthorized => "⚠️ Unauthorized. Please login again.".to_string(),
            PortalError::BadRequest { .. } => {
                "⚠️ Bad request. Please check your input.".to_string()
            }
            PortalError::NotLoggedIn => "No token found. Please login again.".to_string(),
            PortalError::InvalidResponse { .. } => "❌ Invalid response from server.".to_string(),
            PortalError::UnexpectedStatus { .. } => "Unexpected error occurred.".to_string(),
            PortalError::Http(_) | PortalError::RequestFailed { .. } => {
                format!("❌ Could not reach the feedback portal: {}", self)
            }
            PortalError::ValidationError { message } => format!("⚠️ {}", message),
            _ => format!("❌ {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the portal API is running and --api-url is correct",
            ErrorCategory::Authentication => "Run `feedback-portal login` to start a new session",
            ErrorCategory::Input => "Review the command arguments and try again",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Storage => "Check file permissions for the session and output paths",
            ErrorCategory::Server => "The server returned something unexpected; try again later",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
