use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Server responded with {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("Session refresh failed: {source}")]
    RefreshError {
        #[source]
        source: Box<ApiError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No response was received.
    Network,
    /// The server answered 401.
    Auth,
    /// The server answered with any other non-success status.
    Http,
    /// The refresh endpoint rejected the refresh token or was unreachable.
    Refresh,
    Config,
    Storage,
    Data,
}

impl ApiError {
    pub fn http(status: StatusCode, body: impl Into<String>) -> Self {
        ApiError::HttpError {
            status,
            body: body.into(),
        }
    }

    pub fn refresh(source: ApiError) -> Self {
        ApiError::RefreshError {
            source: Box::new(source),
        }
    }

    /// Status code of the response that caused this error, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            ApiError::RefreshError { source } => source.status(),
            _ => None,
        }
    }

    /// True only for a 401 answered by the server; network failures never count.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::HttpError { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::NetworkError(_) => ErrorCategory::Network,
            ApiError::HttpError { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                ErrorCategory::Auth
            }
            ApiError::HttpError { .. } => ErrorCategory::Http,
            ApiError::RefreshError { .. } => ErrorCategory::Refresh,
            ApiError::IoError(_) => ErrorCategory::Storage,
            ApiError::SerializationError(_) | ApiError::InvalidUrl(_) => ErrorCategory::Data,
            ApiError::ConfigError { .. }
            | ApiError::InvalidConfigValueError { .. }
            | ApiError::ConfigValidationError { .. } => ErrorCategory::Config,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Could not reach the BabloBudget server".to_string(),
            ErrorCategory::Auth => "You are not logged in or your session has expired".to_string(),
            ErrorCategory::Refresh => "Your session has expired, please log in again".to_string(),
            ErrorCategory::Http => match self.status() {
                Some(status) if status.is_client_error() => {
                    format!("The server rejected the request ({})", status)
                }
                Some(status) => format!("The server failed to handle the request ({})", status),
                None => self.to_string(),
            },
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Could not access the session file: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the server is running and --base-url is correct",
            ErrorCategory::Auth | ErrorCategory::Refresh => "Run `bablo login` and retry",
            ErrorCategory::Http => "Check the request arguments and retry",
            ErrorCategory::Config => "Fix the configuration file or command-line flags",
            ErrorCategory::Storage => "Check permissions of the session file directory",
            ErrorCategory::Data => "Check that the server version matches this client",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Http | ErrorCategory::Data => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Auth | ErrorCategory::Refresh => 3,
            ErrorCategory::Config | ErrorCategory::Storage => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
