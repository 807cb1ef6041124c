use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Authentication required")]
    AuthRequired {
        message: String,
        hint: String,
        available_profiles: Vec<String>,
    },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Operation '{operation}' is not supported by provider {provider}")]
    Unsupported { operation: String, provider: String },
}

/// Classification of a failed exchange, keyed by HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    UnsupportedMediaType,
    Unexpected,
    Unavailable,
    Aborted,
}

impl ErrorCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCategory::BadRequest,
            401 => ErrorCategory::Unauthorized,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            409 => ErrorCategory::Conflict,
            415 => ErrorCategory::UnsupportedMediaType,
            500 => ErrorCategory::Unexpected,
            501 => ErrorCategory::Unavailable,
            _ => ErrorCategory::Aborted,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::BadRequest => "Bad request",
            ErrorCategory::Unauthorized => "Unauthorized",
            ErrorCategory::Forbidden => "Forbidden",
            ErrorCategory::NotFound => "Not found",
            ErrorCategory::Conflict => "Conflict",
            ErrorCategory::UnsupportedMediaType => "Unsupported media type",
            ErrorCategory::Unexpected => "Unexpected server error",
            ErrorCategory::Unavailable => "Not implemented",
            ErrorCategory::Aborted => "Request aborted",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// The provider answered with a non-2xx status.
    #[error("{category} ({status}): {detail}")]
    Service {
        status: u16,
        category: ErrorCategory,
        detail: String,
    },
    /// The exchange itself failed: transport, timeout or an unreadable stream.
    #[error("Processing failed for {uri}: {message}")]
    Processing {
        uri: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ApiError {
    pub fn service(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Service {
            status,
            category: ErrorCategory::from_status(status),
            detail: detail.into(),
        }
    }

    pub fn processing<E>(uri: impl Into<String>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Processing {
            uri: uri.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            ApiError::Service { category, .. } => Some(*category),
            ApiError::Processing { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            ApiError::Processing { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == Some(ErrorCategory::NotFound)
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Keyring error: {0}")]
    KeyringError(String),
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration save failed: {message}")]
    ConfigSaveFailed { message: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String, field_type: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Pagination requires both start and count (start: {start:?}, count: {count:?})")]
    InvalidPagination {
        start: Option<u32>,
        count: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Processing { .. } => ErrorSeverity::Critical,
                ApiError::Service {
                    category: ErrorCategory::Unauthorized | ErrorCategory::Forbidden,
                    ..
                } => ErrorSeverity::High,
                ApiError::Service { status, .. } if *status >= 500 => ErrorSeverity::High,
                ApiError::Service { .. } => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Api(ApiError::Service {
                category, detail, ..
            }) => format!("{}: {}", category, detail),
            AppError::Api(ApiError::Processing { uri, message, .. }) => {
                format!("Request to {} failed: {}", uri, message)
            }
            AppError::Config(ConfigError::ProfileNotFound { name }) => {
                format!("Profile '{}' is not configured", name)
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Cli(CliError::AuthRequired {
                hint,
                available_profiles,
                ..
            }) => {
                if available_profiles.is_empty() {
                    Some(hint.clone())
                } else {
                    Some(format!(
                        "{} (profiles: {})",
                        hint,
                        available_profiles.join(", ")
                    ))
                }
            }
            AppError::Api(ApiError::Service {
                category: ErrorCategory::Unauthorized,
                ..
            }) => Some("'idm-rest auth login' to store a valid secret".to_string()),
            AppError::Api(ApiError::Service {
                category: ErrorCategory::Forbidden,
                ..
            }) => Some("The configured account lacks the permission for this operation".to_string()),
            AppError::Api(ApiError::Processing { .. }) => {
                Some("Check the profile URL and your network connection".to_string())
            }
            AppError::Config(ConfigError::ProfileNotFound { .. }) => {
                Some("'idm-rest config set url <value>' to create the profile".to_string())
            }
            AppError::Config(ConfigError::InvalidPagination { .. }) => {
                Some("Pass --start and --count together".to_string())
            }
            _ => None,
        }
    }
}
