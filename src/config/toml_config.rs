use crate::core::gemini::{
    DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{AllNoopError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_SETTINGS_FILE: &str = "allnoop.toml";

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub api: Option<ApiSettings>,
    pub models: Option<ModelSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSettings {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    pub text: Option<String>,
    pub image: Option<String>,
}

impl Settings {
    /// Loads `path` when given. Without one, `allnoop.toml` in the working
    /// directory is used if present, otherwise built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Self::from_file(DEFAULT_SETTINGS_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::debug!("Loading settings from {}", path.as_ref().display());
        let content = std::fs::read_to_string(&path).map_err(AllNoopError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AllNoopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// The configured key, ignoring blanks and unresolved `${VAR}` placeholders.
    pub fn api_key(&self) -> Option<String> {
        self.api
            .as_ref()
            .and_then(|a| a.key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty() && !ENV_PLACEHOLDER.is_match(k))
            .map(str::to_string)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", self.base_url())?;

        if let Some(timeout) = self.api.as_ref().and_then(|a| a.timeout_seconds) {
            validate_range("api.timeout_seconds", timeout, 1, 600)?;
        }

        validate_non_empty_string("models.text", self.text_model())?;
        validate_non_empty_string("models.image", self.image_model())?;

        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|a| a.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    fn text_model(&self) -> &str {
        self.models
            .as_ref()
            .and_then(|m| m.text.as_deref())
            .unwrap_or(DEFAULT_TEXT_MODEL)
    }

    fn image_model(&self) -> &str {
        self.models
            .as_ref()
            .and_then(|m| m.image.as_deref())
            .unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.api
                .as_ref()
                .and_then(|a| a.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
