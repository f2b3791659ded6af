use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllNoopError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Image decoding error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("API Key Missing: set API_KEY or VITE_API_KEY, pass --api-key, or add [api] key to allnoop.toml")]
    MissingApiKey,

    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Response blocked by the model ({reason})")]
    Blocked { reason: String },

    #[error("{message}")]
    EmptyResponse { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{message}")]
    ServiceError {
        category: ErrorCategory,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, AllNoopError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    MissingKey,
    RateLimited,
    AccessDenied,
    InvalidKey,
    SafetyBlocked,
    Connection,
    EmptyResult,
    Configuration,
    Validation,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Transient, the same call may succeed later.
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

/// Maps a remote error message onto a category by substring.
///
/// Checked in order: `429`, `403`, `401`, `SAFETY`. Anything else is a
/// connection problem.
pub fn classify(message: &str) -> ErrorCategory {
    if message.contains("429") {
        ErrorCategory::RateLimited
    } else if message.contains("403") {
        ErrorCategory::AccessDenied
    } else if message.contains("401") {
        ErrorCategory::InvalidKey
    } else if message.contains("SAFETY") {
        ErrorCategory::SafetyBlocked
    } else {
        ErrorCategory::Connection
    }
}

impl ErrorCategory {
    /// Human-readable text shown for a classified remote failure.
    pub fn describe(self, raw: &str) -> String {
        match self {
            ErrorCategory::RateLimited => "Rate Limit/Quota Exceeded: Your project is out of free requests. Try again later or switch to your own private key with --api-key.".to_string(),
            ErrorCategory::AccessDenied => {
                "Access Denied: Is the Generative Language API enabled for this key?".to_string()
            }
            ErrorCategory::InvalidKey => {
                "Invalid API Key: Please check your configuration.".to_string()
            }
            ErrorCategory::SafetyBlocked => {
                "Blocked by Safety Filter: The content was flagged as unsafe by the AI model."
                    .to_string()
            }
            _ if raw.trim().is_empty() => {
                "AI Connection Error: Something went wrong while connecting to the AI.".to_string()
            }
            _ => format!("AI Connection Error: {}", raw),
        }
    }
}

impl AllNoopError {
    /// Rewrites a failure from the model call into its user-facing category.
    ///
    /// Local failures (missing key, bad input, config) pass through untouched.
    pub fn classified(self) -> Self {
        match self {
            e @ (AllNoopError::ServiceError { .. }
            | AllNoopError::MissingApiKey
            | AllNoopError::ValidationError { .. }
            | AllNoopError::ConfigValidationError { .. }
            | AllNoopError::InvalidConfigValueError { .. }) => e,
            other => {
                let raw = other.remote_text();
                let category = classify(&raw);
                tracing::debug!(category = ?category, "Generative API error: {}", raw);
                AllNoopError::ServiceError {
                    category,
                    message: category.describe(&raw),
                }
            }
        }
    }

    /// Display text used for classification. Request URLs are left out so a
    /// host or port like `:4031` cannot look like a status code.
    fn remote_text(&self) -> String {
        let text = self.to_string();
        match self {
            AllNoopError::HttpError(e) => match e.url() {
                Some(url) => text
                    .replace(&format!(" for url ({})", url), "")
                    .replace(url.as_str(), ""),
                None => text,
            },
            _ => text,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AllNoopError::ServiceError { category, .. } => *category,
            AllNoopError::MissingApiKey => ErrorCategory::MissingKey,
            AllNoopError::ConfigValidationError { .. }
            | AllNoopError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AllNoopError::ValidationError { .. } => ErrorCategory::Validation,
            AllNoopError::IoError(_) => ErrorCategory::Io,
            AllNoopError::EmptyResponse { .. } => ErrorCategory::EmptyResult,
            other => classify(&other.remote_text()),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::RateLimited | ErrorCategory::Connection => ErrorSeverity::Medium,
            ErrorCategory::SafetyBlocked
            | ErrorCategory::Validation
            | ErrorCategory::EmptyResult => ErrorSeverity::High,
            ErrorCategory::MissingKey
            | ErrorCategory::AccessDenied
            | ErrorCategory::InvalidKey
            | ErrorCategory::Configuration
            | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AllNoopError::ServiceError { message, .. } => message.clone(),
            AllNoopError::ValidationError { message } => message.clone(),
            AllNoopError::EmptyResponse { message } => message.clone(),
            AllNoopError::MissingApiKey
            | AllNoopError::ConfigValidationError { .. }
            | AllNoopError::InvalidConfigValueError { .. }
            | AllNoopError::IoError(_) => self.to_string(),
            other => {
                let raw = other.remote_text();
                classify(&raw).describe(&raw)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::MissingKey => {
                "Export API_KEY (or VITE_API_KEY) before running, or pass --api-key"
            }
            ErrorCategory::RateLimited => "Wait for the quota window to reset or use a private key",
            ErrorCategory::AccessDenied => {
                "Enable the Generative Language API for the project that owns this key"
            }
            ErrorCategory::InvalidKey => "Check that the key was copied completely and is active",
            ErrorCategory::SafetyBlocked => "Rephrase the input and try again",
            ErrorCategory::Connection => "Check your network connection and the configured base_url",
            ErrorCategory::Configuration => "Fix the settings file or command-line flags",
            ErrorCategory::Validation => "Adjust the input and run the command again",
            ErrorCategory::EmptyResult => "Simplify the input and run the command again",
            ErrorCategory::Io => "Check that the file exists and the path is writable",
        }
    }
}
