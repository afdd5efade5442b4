use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Measurement service returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Failed to prepare image: {message}")]
    ConversionError { message: String },

    #[error("No usable body measurements were detected")]
    NoDetection,

    #[error("Measurement outside all {profile} sizing intervals")]
    OutOfRange { profile: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Request was cancelled before results were revealed")]
    Cancelled,
}

impl From<base64::DecodeError> for FitError {
    fn from(err: base64::DecodeError) -> Self {
        FitError::ConversionError {
            message: format!("invalid base64 payload: {}", err),
        }
    }
}

/// Discriminates errors so the presentation layer can pick a message per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Conversion,
    NoDetection,
    OutOfRange,
    Config,
    Io,
    Serialization,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FitError {
    pub fn conversion(message: impl Into<String>) -> Self {
        FitError::ConversionError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FitError::ConfigError {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FitError::TransportError(_) | FitError::ServiceError { .. } => ErrorKind::Transport,
            FitError::ConversionError { .. } => ErrorKind::Conversion,
            FitError::NoDetection => ErrorKind::NoDetection,
            FitError::OutOfRange { .. } => ErrorKind::OutOfRange,
            FitError::IoError(_) => ErrorKind::Io,
            FitError::SerializationError(_) => ErrorKind::Serialization,
            FitError::ConfigError { .. }
            | FitError::InvalidConfigValueError { .. }
            | FitError::MissingConfigError { .. } => ErrorKind::Config,
            FitError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NoDetection | ErrorKind::OutOfRange | ErrorKind::Cancelled => {
                ErrorSeverity::Low
            }
            ErrorKind::Transport => ErrorSeverity::Medium,
            ErrorKind::Conversion | ErrorKind::Serialization => ErrorSeverity::High,
            ErrorKind::Config | ErrorKind::Io => ErrorSeverity::Critical,
        }
    }

    /// Short message meant for end users rather than logs.
    pub fn user_friendly_message(&self) -> String {
        match self {
            FitError::TransportError(_) => {
                "Could not reach the measurement service.".to_string()
            }
            FitError::ServiceError { message, .. } => {
                format!("The measurement service reported an error: {}", message)
            }
            FitError::ConversionError { .. } => "Failed to prepare image.".to_string(),
            FitError::NoDetection => "N/A".to_string(),
            FitError::OutOfRange { .. } => "Size out of range".to_string(),
            FitError::IoError(e) => format!("File access failed: {}", e),
            FitError::SerializationError(_) => {
                "The service response could not be understood.".to_string()
            }
            FitError::ConfigError { message } => format!("Invalid configuration: {}", message),
            FitError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            FitError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            FitError::Cancelled => "Cancelled.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "Check that the measurement service is running and reachable, then retry.",
            ErrorKind::Conversion => "Use a readable JPEG or PNG image and retry.",
            ErrorKind::NoDetection => "Stand fully in frame with shoulders and hips visible, then retake the photo.",
            ErrorKind::OutOfRange => "This sizing chart does not cover the measured chest; try another region's chart.",
            ErrorKind::Config => "Fix the configuration value named above.",
            ErrorKind::Io => "Check the file path and permissions.",
            ErrorKind::Serialization => "Make sure the service endpoint speaks the expected JSON format.",
            ErrorKind::Cancelled => "Start a new request.",
        }
    }
}

pub type Result<T> = std::result::Result<T, FitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_domain_failure_has_distinct_kind_and_message() {
        let errors = [
            FitError::ServiceError {
                status: 502,
                message: "bad gateway".to_string(),
            },
            FitError::conversion("unreadable"),
            FitError::NoDetection,
            FitError::OutOfRange {
                profile: "East".to_string(),
            },
        ];

        let kinds: Vec<ErrorKind> = errors.iter().map(FitError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::Transport,
                ErrorKind::Conversion,
                ErrorKind::NoDetection,
                ErrorKind::OutOfRange
            ]
        );

        let messages: std::collections::HashSet<String> =
            errors.iter().map(FitError::user_friendly_message).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_base64_error_maps_to_conversion() {
        use base64::Engine;
        let err: FitError = base64::engine::general_purpose::STANDARD
            .decode("***")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(FitError::config("x").severity() > FitError::NoDetection.severity());
    }
}
