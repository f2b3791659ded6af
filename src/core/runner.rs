use crate::core::toolkit::Toolkit;
use crate::core::Storage;
use crate::domain::model::{og_image_filename, RegexCheck, ToolCommand, ToolOutput};
use crate::domain::ports::GenerativeModel;
use crate::utils::error::{AllNoopError, Result};

/// Where a rendered result ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Printed(String),
    Saved(String),
}

pub struct ToolRunner<M: GenerativeModel, S: Storage> {
    toolkit: Toolkit<M>,
    storage: S,
}

impl<M: GenerativeModel, S: Storage> ToolRunner<M, S> {
    pub fn new(toolkit: Toolkit<M>, storage: S) -> Self {
        Self { toolkit, storage }
    }

    /// Inline text wins over a file path; one of the two is required.
    pub async fn load_input(&self, inline: Option<String>, file: Option<&str>) -> Result<String> {
        match (inline, file) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) => {
                let bytes = self.storage.read_file(path).await?;
                tracing::debug!("Read {} bytes of input from {}", bytes.len(), path);
                String::from_utf8(bytes).map_err(|e| AllNoopError::ValidationError {
                    message: format!("Input file {} is not valid UTF-8: {}", path, e),
                })
            }
            (None, None) => Err(AllNoopError::ValidationError {
                message: "Provide the input inline or with --file".to_string(),
            }),
        }
    }

    pub async fn execute(&self, command: ToolCommand) -> Result<ToolOutput> {
        let output = match command {
            ToolCommand::MockData(req) => {
                ToolOutput::Text(self.toolkit.generate_mock_data(&req).await?)
            }
            ToolCommand::Regex {
                description,
                test_string,
            } => {
                let suggestion = self.toolkit.generate_regex(&description, &test_string).await?;
                let check = suggestion.check(&test_string);
                if let RegexCheck::InvalidSyntax(reason) = &check {
                    tracing::warn!("Generated pattern does not compile: {}", reason);
                }
                ToolOutput::Text(format!(
                    "{}\n\n{}\n\n{}",
                    suggestion.regex, suggestion.explanation, check
                ))
            }
            ToolCommand::Simplify { code, language } => {
                let language = match language {
                    Some(language) => language,
                    None => {
                        let detected = self.toolkit.detect_language(&code).await;
                        tracing::info!("Detected language: {}", detected);
                        detected
                    }
                };
                ToolOutput::Text(self.toolkit.simplify_code(&code, &language).await?)
            }
            ToolCommand::DetectLanguage { code } => {
                ToolOutput::Text(self.toolkit.detect_language(&code).await)
            }
            ToolCommand::Cron { description } => {
                let cron = self.toolkit.generate_cron(&description).await?;
                ToolOutput::Text(format!("{}\n\n{}", cron.cron, cron.explanation))
            }
            ToolCommand::JsonToTypes { json, language } => {
                ToolOutput::Text(self.toolkit.convert_json_to_types(&json, &language).await?)
            }
            ToolCommand::Readme {
                project_info,
                style,
            } => ToolOutput::Text(self.toolkit.generate_readme(&project_info, &style).await?),
            ToolCommand::CommitMessage { changes, style } => ToolOutput::Text(
                self.toolkit
                    .generate_commit_message(&changes, &style)
                    .await?,
            ),
            ToolCommand::SqlToNoSql { sql, target } => {
                ToolOutput::Text(self.toolkit.sql_to_nosql(&sql, &target).await?)
            }
            ToolCommand::OgImage {
                title,
                subtitle,
                tech,
            } => {
                let image = self
                    .toolkit
                    .generate_og_image(&title, &subtitle, &tech)
                    .await?;
                ToolOutput::Image {
                    image,
                    suggested_name: og_image_filename(&title),
                }
            }
        };

        Ok(output)
    }

    /// Text goes to `destination` when given, else back to the caller for
    /// printing. Images are always written, to their suggested name by default.
    pub async fn deliver(&self, output: ToolOutput, destination: Option<&str>) -> Result<Delivery> {
        match (output, destination) {
            (ToolOutput::Text(text), None) => Ok(Delivery::Printed(text)),
            (ToolOutput::Text(text), Some(path)) => {
                let saved = self.storage.write_file(path, text.as_bytes()).await?;
                Ok(Delivery::Saved(saved))
            }
            (
                ToolOutput::Image {
                    image,
                    suggested_name,
                },
                destination,
            ) => {
                let path = destination.unwrap_or(suggested_name.as_str());
                tracing::debug!("Writing {} byte image to {}", image.data.len(), path);
                let saved = self.storage.write_file(path, &image.data).await?;
                Ok(Delivery::Saved(saved))
            }
        }
    }

    pub async fn run(&self, command: ToolCommand, destination: Option<&str>) -> Result<Delivery> {
        let output = self.execute(command).await?;
        self.deliver(output, destination).await
    }
}
