use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("API request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("API responded with status {status}: {body}")]
    HttpStatusError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid JSON payload: {message}")]
    InvalidPayloadError { message: String },

    #[error("Unsupported operation: {operation}")]
    UnsupportedOperationError { operation: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

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

    #[error("Record {index} ({operation}) failed: {source}")]
    RecordFailed {
        index: usize,
        operation: String,
        #[source]
        source: Box<ConnectorError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    RemoteApi,
    Input,
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

impl ConnectorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConnectorError::TransportError(_) => ErrorCategory::Network,
            ConnectorError::HttpStatusError { .. } => ErrorCategory::RemoteApi,
            ConnectorError::InvalidPayloadError { .. }
            | ConnectorError::UnsupportedOperationError { .. }
            | ConnectorError::ValidationError { .. }
            | ConnectorError::SerializationError(_) => ErrorCategory::Input,
            ConnectorError::ConfigError { .. }
            | ConnectorError::MissingConfigError { .. }
            | ConnectorError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ConnectorError::IoError(_) => ErrorCategory::System,
            ConnectorError::RecordFailed { source, .. } => source.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路問題通常可以重試
            ConnectorError::TransportError(_) => ErrorSeverity::Medium,
            ConnectorError::HttpStatusError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            ConnectorError::HttpStatusError { .. } => ErrorSeverity::High,
            ConnectorError::InvalidPayloadError { .. }
            | ConnectorError::UnsupportedOperationError { .. }
            | ConnectorError::ValidationError { .. }
            | ConnectorError::SerializationError(_) => ErrorSeverity::High,
            ConnectorError::ConfigError { .. }
            | ConnectorError::MissingConfigError { .. }
            | ConnectorError::InvalidConfigValueError { .. }
            | ConnectorError::IoError(_) => ErrorSeverity::Critical,
            ConnectorError::RecordFailed { source, .. } => source.severity(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ConnectorError::TransportError(_) => {
                "Check network connectivity and that the selected environment host is reachable"
                    .to_string()
            }
            ConnectorError::HttpStatusError { status, .. } => match status {
                401 | 403 => "Verify username, password and WOLT-API-KEY for this environment"
                    .to_string(),
                404 => "Verify the venue ID exists in the selected environment".to_string(),
                429 => "The API is rate limiting requests, try again later".to_string(),
                s if *s >= 500 => "The Wolt API is unavailable, try again later".to_string(),
                _ => "Inspect the response body for details about the rejected request"
                    .to_string(),
            },
            ConnectorError::InvalidPayloadError { .. } | ConnectorError::SerializationError(_) => {
                "Make sure the data field contains valid JSON".to_string()
            }
            ConnectorError::UnsupportedOperationError { .. } => {
                "Use one of: getMenu, updateItems, updateInventory".to_string()
            }
            ConnectorError::ValidationError { .. } => {
                "Fix the input record and run again".to_string()
            }
            ConnectorError::ConfigError { .. }
            | ConnectorError::MissingConfigError { .. }
            | ConnectorError::InvalidConfigValueError { .. } => {
                "Check the configuration file and WOLT_* environment variables".to_string()
            }
            ConnectorError::IoError(_) => "Check file paths and permissions".to_string(),
            ConnectorError::RecordFailed { source, .. } => format!(
                "{} (or enable --continue-on-fail to skip failing records)",
                source.recovery_suggestion()
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConnectorError::TransportError(_) => "Could not reach the Wolt API".to_string(),
            ConnectorError::HttpStatusError { status, .. } => {
                format!("The Wolt API rejected the request (HTTP {})", status)
            }
            ConnectorError::RecordFailed {
                index,
                operation,
                source,
            } => format!(
                "Record #{} ({}) failed: {}",
                index,
                operation,
                source.user_friendly_message()
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
