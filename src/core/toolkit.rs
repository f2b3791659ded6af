use crate::core::gemini::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::core::markdown::clean_markdown;
use crate::core::ConfigProvider;
use crate::domain::model::{
    is_listed, CronSuggestion, GeneratedImage, ImageRequest, MockDataRequest, MockFormat,
    RegexSuggestion, TextRequest, CODE_LANGUAGES, COMMIT_STYLES, NOSQL_TARGETS, README_STYLES,
    TYPE_LANGUAGES,
};
use crate::domain::ports::GenerativeModel;
use crate::utils::error::{AllNoopError, Result};
use crate::utils::validation::{require_input, Validate};
use serde::de::DeserializeOwned;

pub const DEFAULT_LANGUAGE: &str = "JavaScript";
pub const DEFAULT_README_STYLE: &str = "Standard";
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore: update code";
const DETECTION_SAMPLE_CHARS: usize = 500;

/// The developer utilities, each a single prompt round-trip to `M`.
pub struct Toolkit<M: GenerativeModel> {
    model: M,
    text_model: String,
    image_model: String,
}

impl<M: GenerativeModel> Toolkit<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(model: M, config: &C) -> Self {
        Self {
            model,
            text_model: config.text_model().to_string(),
            image_model: config.image_model().to_string(),
        }
    }

    async fn ask(&self, request: TextRequest) -> Result<String> {
        tracing::debug!("Prompt for {}: {}", request.model, request.prompt);
        self.model
            .generate_text(&request)
            .await
            .map_err(AllNoopError::classified)
    }

    fn parse_reply<T: DeserializeOwned>(text: &str) -> Result<T> {
        let body = clean_markdown(Some(text));
        let body = if body.is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| AllNoopError::from(e).classified())
    }

    pub async fn generate_mock_data(&self, req: &MockDataRequest) -> Result<String> {
        req.validate()?;

        let mut prompt = format!(
            "Generate {} records of {} mock data about \"{}\".",
            req.count,
            req.complexity.as_str().to_lowercase(),
            req.topic
        );

        let data = if req.format == MockFormat::Json {
            prompt.push_str(" Return ONLY a raw JSON array.");
            let text = self
                .ask(TextRequest::new(&self.text_model, prompt).json())
                .await?;
            if text.is_empty() {
                "[]".to_string()
            } else {
                text
            }
        } else {
            prompt.push_str(&format!(
                " Return ONLY the raw data in {} format.",
                req.format.as_str()
            ));
            let text = self.ask(TextRequest::new(&self.text_model, prompt)).await?;
            clean_markdown(Some(&text))
        };

        match count_records(req.format, &data) {
            Some(found) if found != req.count as usize => tracing::warn!(
                "Asked for {} {} records, model returned {}",
                req.count,
                req.format.as_str(),
                found
            ),
            Some(found) => tracing::info!("Generated {} {} records", found, req.format.as_str()),
            None => tracing::debug!("Could not count records in {} output", req.format.as_str()),
        }

        Ok(data)
    }

    pub async fn generate_regex(
        &self,
        description: &str,
        test_string: &str,
    ) -> Result<RegexSuggestion> {
        require_input("Description", description)?;
        if test_string.trim().is_empty() {
            return Err(AllNoopError::ValidationError {
                message: "Please provide a test string to ensure the pattern matches your needs."
                    .to_string(),
            });
        }

        let prompt = format!(
            "You are a Regex expert. Generate a Regular Expression for: \"{}\". Validate it against this test string: \"{}\". Return valid JSON with \"regex\" and \"explanation\" keys.",
            description, test_string
        );
        let text = self
            .ask(TextRequest::new(&self.text_model, prompt).json_object(&["regex", "explanation"]))
            .await?;
        Self::parse_reply(&text)
    }

    pub async fn simplify_code(&self, code: &str, language: &str) -> Result<String> {
        require_input("Code", code)?;
        if !is_listed(CODE_LANGUAGES, language) {
            tracing::debug!("'{}' is not a listed language, passing it through", language);
        }

        let prompt = format!(
            "Refactor this {} code to be more readable, efficient and modern. Return ONLY the code:\n\n{}",
            language, code
        );
        let text = self.ask(TextRequest::new(&self.text_model, prompt)).await?;
        Ok(clean_markdown(Some(&text)))
    }

    /// Never fails: any error or empty reply falls back to JavaScript.
    pub async fn detect_language(&self, code: &str) -> String {
        if code.trim().is_empty() {
            return DEFAULT_LANGUAGE.to_string();
        }

        let sample: String = code.chars().take(DETECTION_SAMPLE_CHARS).collect();
        let prompt = format!(
            "Identify the programming language. Reply with ONLY the name:\n\n{}",
            sample
        );

        match self
            .model
            .generate_text(&TextRequest::new(&self.text_model, prompt))
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => DEFAULT_LANGUAGE.to_string(),
            Err(e) => {
                tracing::warn!("Language detection failed: {}", e);
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }

    pub async fn generate_cron(&self, description: &str) -> Result<CronSuggestion> {
        require_input("Description", description)?;

        let prompt = format!(
            "Convert to Cron: \"{}\". Return JSON {{cron, explanation}}",
            description
        );
        let text = self
            .ask(TextRequest::new(&self.text_model, prompt).json_object(&["cron", "explanation"]))
            .await?;
        Self::parse_reply(&text)
    }

    pub async fn convert_json_to_types(&self, json: &str, language: &str) -> Result<String> {
        require_input("JSON input", json)?;
        serde_json::from_str::<serde_json::Value>(json).map_err(|e| {
            AllNoopError::ValidationError {
                message: format!("Invalid JSON input: {}", e),
            }
        })?;
        if !is_listed(TYPE_LANGUAGES, language) {
            tracing::debug!("'{}' is not a listed type language, passing it through", language);
        }

        let prompt = format!(
            "You are a senior developer. Convert this raw JSON object into {} type definitions (interfaces/classes). Use standard naming conventions. Return ONLY the code, NO explanation or markdown headers:\n\n{}",
            language, json
        );
        let text = self.ask(TextRequest::new(&self.text_model, prompt)).await?;
        let code = clean_markdown(Some(&text));
        if code.is_empty() {
            return Err(AllNoopError::EmptyResponse {
                message: "AI returned empty result. Try simplifying your JSON.".to_string(),
            });
        }
        Ok(code)
    }

    pub async fn generate_readme(&self, project_info: &str, style: &str) -> Result<String> {
        require_input("Project description", project_info)?;
        let style = if style.trim().is_empty() {
            DEFAULT_README_STYLE
        } else {
            style
        };
        if !is_listed(README_STYLES, style) {
            tracing::debug!("'{}' is not a listed README style, passing it through", style);
        }

        let prompt = format!(
            "Generate a {} README.md for: {}. Return raw markdown only.",
            style, project_info
        );
        let text = self.ask(TextRequest::new(&self.text_model, prompt)).await?;
        Ok(clean_markdown(Some(&text)))
    }

    pub async fn generate_commit_message(&self, changes: &str, style: &str) -> Result<String> {
        require_input("Changes", changes)?;
        if !is_listed(COMMIT_STYLES, style) {
            tracing::debug!("'{}' is not a listed commit style, passing it through", style);
        }

        let prompt = format!(
            "Write a Git commit message for: \"{}\". Style: {}. Message only.",
            changes, style
        );
        let text = self.ask(TextRequest::new(&self.text_model, prompt)).await?;
        let message = text.trim();
        if message.is_empty() {
            Ok(DEFAULT_COMMIT_MESSAGE.to_string())
        } else {
            Ok(message.to_string())
        }
    }

    pub async fn sql_to_nosql(&self, sql: &str, target: &str) -> Result<String> {
        require_input("SQL", sql)?;
        if !is_listed(NOSQL_TARGETS, target) {
            tracing::debug!("'{}' is not a listed NoSQL target, passing it through", target);
        }

        let prompt = format!(
            "Convert this SQL to {}. Optimize structure, no markdown, code only:\n\n{}",
            target, sql
        );
        let text = self.ask(TextRequest::new(&self.text_model, prompt)).await?;
        Ok(clean_markdown(Some(&text)))
    }

    pub async fn generate_og_image(
        &self,
        title: &str,
        subtitle: &str,
        tech: &str,
    ) -> Result<GeneratedImage> {
        require_input("Title", title)?;

        let request = ImageRequest {
            model: self.image_model.clone(),
            prompt: format!(
                "Developer OG Image. Project: \"{}\". Tagline: \"{}\". Tech: {}. Professional dark theme, minimalist.",
                title, subtitle, tech
            ),
            aspect_ratio: "16:9".to_string(),
            image_size: "1K".to_string(),
        };

        self.model
            .generate_image(&request)
            .await
            .map_err(AllNoopError::classified)
    }
}

/// Best-effort record count of generated mock data. SQL is not inspected.
fn count_records(format: MockFormat, data: &str) -> Option<usize> {
    match format {
        MockFormat::Json => serde_json::from_str::<Vec<serde_json::Value>>(data)
            .ok()
            .map(|rows| rows.len()),
        MockFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_reader(data.as_bytes());
            let mut rows = 0;
            for record in reader.records() {
                if let Err(e) = record.map_err(AllNoopError::from) {
                    tracing::debug!("Generated CSV is malformed: {}", e);
                    return None;
                }
                rows += 1;
            }
            Some(rows)
        }
        MockFormat::Sql => None,
    }
}
