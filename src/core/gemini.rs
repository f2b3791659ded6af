use crate::core::key::ResolvedKey;
use crate::core::ConfigProvider;
use crate::domain::model::{GeneratedImage, ImageRequest, TextRequest};
use crate::domain::ports::GenerativeModel;
use crate::utils::error::{AllNoopError, Result};
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
    pub image_size: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    status: Option<String>,
}

impl GenerateContentResponse {
    fn check_blocked(&self) -> Result<()> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(AllNoopError::Blocked {
                reason: reason.clone(),
            });
        }
        if let Some(candidate) = self.candidates.first() {
            if candidate.finish_reason.as_deref() == Some("SAFETY") {
                return Err(AllNoopError::Blocked {
                    reason: "SAFETY".to_string(),
                });
            }
        }
        Ok(())
    }

    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate, empty when there is none.
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: ResolvedKey,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: ResolvedKey) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(api_key: ResolvedKey, config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model);
        tracing::debug!("Sending generateContent request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&raw) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{} ({})", envelope.error.message, code),
                    None => envelope.error.message,
                },
                Err(_) => raw,
            };
            return Err(AllNoopError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.check_blocked()?;
        Ok(parsed)
    }
}

fn user_prompt(prompt: &str) -> Vec<Content> {
    vec![Content {
        role: Some("user".to_string()),
        parts: vec![Part {
            text: Some(prompt.to_string()),
            inline_data: None,
        }],
    }]
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        let generation_config =
            if request.response_mime_type.is_some() || request.response_schema.is_some() {
                Some(GenerationConfig {
                    response_mime_type: request.response_mime_type.clone(),
                    response_schema: request.response_schema.clone(),
                    image_config: None,
                })
            } else {
                None
            };

        let body = GenerateContentRequest {
            contents: user_prompt(&request.prompt),
            generation_config,
        };

        let response = self.generate_content(&request.model, &body).await?;
        Ok(response.text())
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        let body = GenerateContentRequest {
            contents: user_prompt(&request.prompt),
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.clone(),
                    image_size: request.image_size.clone(),
                }),
                ..Default::default()
            }),
        };

        let response = self.generate_content(&request.model, &body).await?;

        let inline = response
            .first_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .ok_or_else(|| AllNoopError::EmptyResponse {
                message: "No image generated.".to_string(),
            })?;

        let data = base64::engine::general_purpose::STANDARD.decode(inline.data.as_bytes())?;
        tracing::debug!("Decoded {} image bytes ({})", data.len(), inline.mime_type);

        Ok(GeneratedImage {
            mime_type: inline.mime_type.clone(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key::KeySource;
    use httpmock::prelude::*;

    const TEXT_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";
    const IMAGE_PATH: &str = "/v1beta/models/gemini-3-pro-image-preview:generateContent";

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(ResolvedKey::new("test-key", KeySource::CommandLine))
            .with_base_url(&server.base_url())
    }

    fn text_reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_generate_text_sends_key_and_prompt() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(TEXT_PATH)
                .header("x-goog-api-key", "test-key")
                .body_contains("\"text\":\"say hi\"");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(text_reply("hi"));
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "say hi");
        let text = client(&server).generate_text(&request).await.unwrap();

        api_mock.assert();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn test_generate_text_forwards_json_schema() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(TEXT_PATH)
                .body_contains("\"responseMimeType\":\"application/json\"")
                .body_contains("\"responseSchema\"");
            then.status(200)
                .json_body(text_reply(r#"{"cron":"0 0 * * *","explanation":"daily"}"#));
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "daily").json_object(&["cron", "explanation"]);
        let text = client(&server).generate_text(&request).await.unwrap();

        api_mock.assert();
        assert!(text.contains("0 0 * * *"));
    }

    #[tokio::test]
    async fn test_generate_text_joins_parts() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(TEXT_PATH);
            then.status(200).json_body(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "foo" }, { "text": "bar" }] } }]
            }));
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "x");
        let text = client(&server).generate_text(&request).await.unwrap();
        assert_eq!(text, "foobar");
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(TEXT_PATH);
            then.status(200).json_body(serde_json::json!({}));
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "x");
        let text = client(&server).generate_text(&request).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_error_status_carries_code_and_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(TEXT_PATH);
            then.status(429).json_body(serde_json::json!({
                "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
            }));
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "x");
        let err = client(&server).generate_text(&request).await.unwrap_err();

        match &err {
            AllNoopError::ApiError { status, message } => {
                assert_eq!(*status, 429);
                assert_eq!(message, "Quota exceeded (RESOURCE_EXHAUSTED)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_error_status_with_plain_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(TEXT_PATH);
            then.status(502).body("bad gateway");
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "x");
        let err = client(&server).generate_text(&request).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API request failed with status 502: bad gateway"
        );
    }

    #[tokio::test]
    async fn test_prompt_blocked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(TEXT_PATH);
            then.status(200).json_body(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            }));
        });

        let request = TextRequest::new(DEFAULT_TEXT_MODEL, "x");
        let err = client(&server).generate_text(&request).await.unwrap_err();
        assert!(matches!(err, AllNoopError::Blocked { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_generate_image_decodes_inline_data() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(IMAGE_PATH)
                .body_contains("\"aspectRatio\":\"16:9\"")
                .body_contains("\"imageSize\":\"1K\"");
            then.status(200).json_body(serde_json::json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "Here is your image" },
                    { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                ] } }]
            }));
        });

        let request = ImageRequest {
            model: DEFAULT_IMAGE_MODEL.to_string(),
            prompt: "og".to_string(),
            aspect_ratio: "16:9".to_string(),
            image_size: "1K".to_string(),
        };
        let image = client(&server).generate_image(&request).await.unwrap();

        api_mock.assert();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[tokio::test]
    async fn test_generate_image_without_inline_data() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(IMAGE_PATH);
            then.status(200).json_body(text_reply("I cannot draw"));
        });

        let request = ImageRequest {
            model: DEFAULT_IMAGE_MODEL.to_string(),
            prompt: "og".to_string(),
            aspect_ratio: "16:9".to_string(),
            image_size: "1K".to_string(),
        };
        let err = client(&server).generate_image(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "No image generated.");
    }
}
