use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API rejected the request with status {status}: {body}")]
    RejectedError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input format error: {message}")]
    InputFormatError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ApiError(_) | SyncError::RejectedError { .. } => ErrorCategory::Network,
            SyncError::IoError(_)
            | SyncError::SerializationError(_)
            | SyncError::InputFormatError { .. } => ErrorCategory::Input,
            SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::ApiError(_) => "Check network connectivity and the AppSheet base URL",
            SyncError::RejectedError { status, .. } if *status == 401 || *status == 403 => {
                "Check the application id and access key"
            }
            SyncError::RejectedError { .. } => {
                "Inspect the response body; the table name or row columns may not match the app"
            }
            SyncError::IoError(_) => "Make sure the input file exists and is readable",
            SyncError::SerializationError(_) | SyncError::InputFormatError { .. } => {
                "The input file must contain a JSON array of objects"
            }
            SyncError::MissingConfigError { .. } => {
                "Pass the value on the command line, set its environment variable, or add it to the config file"
            }
            SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Upload failed: {}", self),
            ErrorCategory::Input => format!("Could not load input: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
