use crate::utils::error::{AllNoopError, Result};
use crate::utils::validation::{require_input, validate_range, Validate};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_MOCK_RECORDS: u32 = 1;
pub const MAX_MOCK_RECORDS: u32 = 50;

pub const CODE_LANGUAGES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "React TSX",
    "Java",
    "Go",
    "Rust",
    "C++",
    "PHP",
];

pub const TYPE_LANGUAGES: &[&str] = &[
    "TypeScript",
    "Go",
    "Rust",
    "Python (Pydantic)",
    "Java (Lombok)",
    "Swift",
    "Kotlin",
];

pub const README_STYLES: &[&str] = &[
    "Standard",
    "Minimal",
    "Corporate",
    "Open Source (Fun)",
    "Technical / API Docs",
];

pub const COMMIT_STYLES: &[&str] = &[
    "Conventional Commits",
    "Emoji / Gitmoji",
    "Short & Sweet",
    "Detailed",
    "Angry Developer",
];

pub const NOSQL_TARGETS: &[&str] = &["MongoDB", "Firestore", "DynamoDB", "Redis (JSON)", "Cassandra"];

/// Case-insensitive lookup in one of the option catalogues.
pub fn is_listed(catalog: &[&str], value: &str) -> bool {
    catalog.iter().any(|c| c.eq_ignore_ascii_case(value.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MockFormat {
    Json,
    Csv,
    Sql,
}

impl MockFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MockFormat::Json => "JSON",
            MockFormat::Csv => "CSV",
            MockFormat::Sql => "SQL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Complexity {
    Simple,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Complex => "Complex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockDataRequest {
    pub topic: String,
    pub format: MockFormat,
    pub count: u32,
    pub complexity: Complexity,
}

impl Validate for MockDataRequest {
    fn validate(&self) -> Result<()> {
        require_input("Topic", &self.topic)?;
        validate_range("count", self.count, MIN_MOCK_RECORDS, MAX_MOCK_RECORDS).map_err(|e| {
            AllNoopError::ValidationError {
                message: e.to_string(),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexSuggestion {
    pub regex: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexCheck {
    Matches,
    NoMatch,
    InvalidSyntax(String),
}

impl RegexSuggestion {
    /// Compiles the suggested pattern locally and runs it against `sample`.
    pub fn check(&self, sample: &str) -> RegexCheck {
        match regex::Regex::new(&self.regex) {
            Ok(re) if re.is_match(sample) => RegexCheck::Matches,
            Ok(_) => RegexCheck::NoMatch,
            Err(e) => RegexCheck::InvalidSyntax(e.to_string()),
        }
    }
}

impl fmt::Display for RegexCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexCheck::Matches => write!(f, "Pattern matches the test string"),
            RegexCheck::NoMatch => write!(f, "Pattern does not match the test string"),
            RegexCheck::InvalidSyntax(reason) => write!(f, "Invalid regex syntax generated: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CronSuggestion {
    pub cron: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl GeneratedImage {
    /// Browser-style `data:` URL of the image, always tagged as PNG.
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// Default download name for an OG image: `og_image_<title>.png`.
pub fn og_image_filename(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("og_image_{}.png", slug)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRequest {
    pub model: String,
    pub prompt: String,
    pub response_mime_type: Option<String>,
    pub response_schema: Option<serde_json::Value>,
}

impl TextRequest {
    pub fn new(model: &str, prompt: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.into(),
            response_mime_type: None,
            response_schema: None,
        }
    }

    /// Asks for `application/json` output.
    pub fn json(mut self) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self
    }

    /// Asks for a JSON object whose listed keys are all required strings.
    pub fn json_object(self, keys: &[&str]) -> Self {
        let properties: serde_json::Map<String, serde_json::Value> = keys
            .iter()
            .map(|k| (k.to_string(), serde_json::json!({ "type": "STRING" })))
            .collect();
        let mut request = self.json();
        request.response_schema = Some(serde_json::json!({
            "type": "OBJECT",
            "properties": properties,
            "required": keys,
        }));
        request
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub aspect_ratio: String,
    pub image_size: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    MockData(MockDataRequest),
    Regex {
        description: String,
        test_string: String,
    },
    Simplify {
        code: String,
        language: Option<String>,
    },
    DetectLanguage {
        code: String,
    },
    Cron {
        description: String,
    },
    JsonToTypes {
        json: String,
        language: String,
    },
    Readme {
        project_info: String,
        style: String,
    },
    CommitMessage {
        changes: String,
        style: String,
    },
    SqlToNoSql {
        sql: String,
        target: String,
    },
    OgImage {
        title: String,
        subtitle: String,
        tech: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Image {
        image: GeneratedImage,
        suggested_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str, count: u32) -> MockDataRequest {
        MockDataRequest {
            topic: topic.to_string(),
            format: MockFormat::Json,
            count,
            complexity: Complexity::Simple,
        }
    }

    #[test]
    fn test_mock_request_validation() {
        assert!(request("users", 10).validate().is_ok());
        assert!(request("users", 50).validate().is_ok());
        assert!(request("users", 0).validate().is_err());
        assert!(request("users", 51).validate().is_err());
        assert!(request("  ", 10).validate().is_err());
    }

    #[test]
    fn test_regex_check() {
        let suggestion = RegexSuggestion {
            regex: r"^\d{3}-\d{4}$".to_string(),
            explanation: "phone".to_string(),
        };
        assert_eq!(suggestion.check("555-1234"), RegexCheck::Matches);
        assert_eq!(suggestion.check("5551234"), RegexCheck::NoMatch);

        let broken = RegexSuggestion {
            regex: "(unclosed".to_string(),
            explanation: String::new(),
        };
        assert!(matches!(broken.check("x"), RegexCheck::InvalidSyntax(_)));
    }

    #[test]
    fn test_og_image_filename() {
        assert_eq!(og_image_filename("My Cool  Project"), "og_image_my_cool_project.png");
    }

    #[test]
    fn test_json_object_schema() {
        let req = TextRequest::new("m", "p").json_object(&["cron", "explanation"]);
        assert_eq!(req.response_mime_type.as_deref(), Some("application/json"));
        let schema = req.response_schema.unwrap();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["cron"]["type"], "STRING");
        assert_eq!(schema["required"], serde_json::json!(["cron", "explanation"]));
    }

    #[test]
    fn test_data_url() {
        let image = GeneratedImage {
            mime_type: "image/png".to_string(),
            data: b"png".to_vec(),
        };
        assert_eq!(image.data_url(), "data:image/png;base64,cG5n");
    }

    #[test]
    fn test_is_listed() {
        assert!(is_listed(NOSQL_TARGETS, "mongodb"));
        assert!(!is_listed(NOSQL_TARGETS, "CouchDB"));
    }
}
