pub mod gemini;
pub mod key;
pub mod markdown;
pub mod onboarding;
pub mod runner;
pub mod toolkit;

pub use crate::domain::model::{ToolCommand, ToolOutput};
pub use crate::domain::ports::{ConfigProvider, GenerativeModel, Storage};
pub use crate::utils::error::Result;
