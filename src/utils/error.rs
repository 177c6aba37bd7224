use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("The value \"{value}\" is not a string")]
    TypeConversionError { value: String },

    #[error("The JSON value can not be deserialized: {0}")]
    ValueDeserializationError(#[source] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Scheduler error: {message}")]
    SchedulerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Network,
    Parse,
    Output,
    Internal,
}

impl CrawlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CrawlError::ConfigError { .. }
            | CrawlError::ConfigParseError { .. }
            | CrawlError::MissingConfigError { .. }
            | CrawlError::InvalidConfigValueError { .. }
            | CrawlError::UrlError(_) => ErrorCategory::Config,
            CrawlError::HttpError(_) => ErrorCategory::Network,
            CrawlError::TypeConversionError { .. } | CrawlError::ValueDeserializationError(_) => {
                ErrorCategory::Parse
            }
            CrawlError::CsvError(_) | CrawlError::IoError(_) => ErrorCategory::Output,
            CrawlError::SchedulerError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Config => {
                "Check the command line flags, the TOML file and the EMAIL/PASSWORD environment variables"
            }
            ErrorCategory::Network => "Check network connectivity and that the site is reachable",
            ErrorCategory::Parse => "The site markup may have changed; inspect the logged field names",
            ErrorCategory::Output => "Check that the output directory exists and is writable",
            ErrorCategory::Internal => "Re-run with --verbose and report the log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CrawlError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            CrawlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CrawlError::HttpError(e) => format!("Could not reach the site: {}", e),
            CrawlError::IoError(e) => format!("Could not write the export: {}", e),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Output => 3,
            ErrorCategory::Parse | ErrorCategory::Internal => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
