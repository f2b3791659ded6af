use crate::utils::error::{AllNoopError, Result};
use std::fmt;

/// Where an API key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    CommandLine,
    Environment(&'static str),
    SettingsFile,
    BuildTime,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::CommandLine => write!(f, "--api-key flag"),
            KeySource::Environment(name) => write!(f, "environment variable {}", name),
            KeySource::SettingsFile => write!(f, "settings file"),
            KeySource::BuildTime => write!(f, "build-time ALLNOOP_API_KEY"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    value: String,
    source: KeySource,
}

impl ResolvedKey {
    pub fn new(value: impl Into<String>, source: KeySource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    /// The key with everything but the last four characters hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

impl fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("value", &self.masked())
            .field("source", &self.source)
            .finish()
    }
}

/// Ordered chain of places an API key may be injected. First non-blank wins.
#[derive(Debug, Default, Clone)]
pub struct KeyResolver {
    candidates: Vec<(KeySource, Option<String>)>,
}

impl KeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: flag, `API_KEY`, `VITE_API_KEY`, settings file,
    /// then whatever was baked in at compile time.
    pub fn standard(explicit: Option<String>, from_settings: Option<String>) -> Self {
        Self::new()
            .with_candidate(KeySource::CommandLine, explicit)
            .with_env_var("API_KEY")
            .with_env_var("VITE_API_KEY")
            .with_candidate(KeySource::SettingsFile, from_settings)
            .with_build_time()
    }

    pub fn with_candidate(mut self, source: KeySource, value: Option<String>) -> Self {
        self.candidates.push((source, value));
        self
    }

    pub fn with_env_var(self, name: &'static str) -> Self {
        let value = std::env::var(name).ok();
        self.with_candidate(KeySource::Environment(name), value)
    }

    pub fn with_build_time(self) -> Self {
        let value = option_env!("ALLNOOP_API_KEY").map(str::to_string);
        self.with_candidate(KeySource::BuildTime, value)
    }

    pub fn resolve(&self) -> Option<ResolvedKey> {
        self.candidates.iter().find_map(|(source, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| ResolvedKey::new(v, *source))
        })
    }

    pub fn require(&self) -> Result<ResolvedKey> {
        let key = self.resolve().ok_or(AllNoopError::MissingApiKey)?;
        tracing::debug!("Using API key {} from {}", key.masked(), key.source());
        Ok(key)
    }
}
