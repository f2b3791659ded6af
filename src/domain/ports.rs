use crate::domain::model::{GeneratedImage, ImageRequest, TextRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Endpoint and model settings, regardless of where they were loaded from.
pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn text_model(&self) -> &str;
    fn image_model(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}

/// A remote text/image generation endpoint.
///
/// Implementations return the raw reply; an empty string means the model
/// produced no text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_text(&self, request: &TextRequest) -> Result<String>;
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage>;
}
