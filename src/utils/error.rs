use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Standings source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Standings page could not be parsed: {message}")]
    ParseFailure { message: String },

    #[error("Snapshot publish failed: {message}")]
    PublishFailure { message: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Parse,
    Publish,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LeaderboardError {
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    pub fn parse_failure(message: impl Into<String>) -> Self {
        Self::ParseFailure {
            message: message.into(),
        }
    }

    pub fn publish_failure(message: impl Into<String>) -> Self {
        Self::PublishFailure {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceUnavailable { .. } | Self::HttpError(_) => ErrorCategory::Source,
            Self::ParseFailure { .. } => ErrorCategory::Parse,
            Self::PublishFailure { .. } | Self::CsvError(_) => ErrorCategory::Publish,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Source and parse failures clear up on their own, so the next scheduled
    /// run is the retry.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Source | ErrorCategory::Parse => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Publish | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Source | ErrorCategory::Parse => {
                format!("Scraper failed to find data... ({})", self)
            }
            ErrorCategory::Publish => format!("Leaderboard was not published: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Source => {
                "Check network access to the standings page; the next scheduled run will try again"
            }
            ErrorCategory::Parse => {
                "The standings page layout may have changed; check source.table_marker"
            }
            ErrorCategory::Publish => {
                "Check the sink credentials and permissions; the previous snapshot is still in place"
            }
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::System => "Check disk space and file permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
