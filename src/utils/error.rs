use thiserror::Error;

#[derive(Error, Debug)]
pub enum HackathonError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Team data file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Line {line}: {message}")]
    RecordError { line: u64, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HackathonError {
    pub fn record(line: u64, message: impl Into<String>) -> Self {
        Self::RecordError {
            line,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::SourceNotFound { .. } => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::SerializationError(_) | Self::RecordError { .. } => {
                ErrorCategory::Data
            }
            Self::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆記錄錯誤只會跳過該行
            Self::RecordError { .. } | Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorSeverity::Medium,
            Self::SourceNotFound { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => {
                "Place the team data CSV in the configured base directory or pass --data-file"
            }
            Self::IoError(_) => "Check that the path exists and the process has read/write permission",
            Self::CsvError(_) | Self::RecordError { .. } => {
                "Check the row has an id, name, university, category, two spare columns and five integer scores"
            }
            Self::SerializationError(_) => "Re-run the command; the output could not be encoded",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the TOML configuration file and make sure every referenced ${VAR} is set"
            }
            Self::ValidationError { .. } => "Correct the input value and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SourceNotFound { path } => format!("Could not find the team data file '{}'", path),
            Self::IoError(e) => format!("A file operation failed: {}", e),
            Self::RecordError { line, message } => {
                format!("Team data line {} could not be read: {}", line, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HackathonError>;
