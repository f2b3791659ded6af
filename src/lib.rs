pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::{LocalStorage, Settings};
pub use core::{
    gemini::GeminiClient,
    key::{KeyResolver, KeySource, ResolvedKey},
    markdown::clean_markdown,
    onboarding::GitOnboarding,
    runner::{Delivery, ToolRunner},
    toolkit::Toolkit,
};
pub use utils::error::{AllNoopError, Result};
