use crate::core::toolkit::DEFAULT_README_STYLE;
use crate::domain::model::{Complexity, MockDataRequest, MockFormat, ToolCommand};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "allnoop")]
#[command(about = "Developer utilities backed by a generative-AI endpoint")]
#[command(version)]
pub struct CliConfig {
    #[arg(long, global = true, help = "API key (overrides API_KEY / VITE_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(long, global = true, help = "Settings file (defaults to ./allnoop.toml)")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Write the result to this file")]
    pub output: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate mock records about a topic
    MockData {
        topic: String,
        #[arg(long, value_enum, default_value_t = MockFormat::Json)]
        format: MockFormat,
        #[arg(long, default_value_t = 10)]
        count: u32,
        #[arg(long, value_enum, default_value_t = Complexity::Simple)]
        complexity: Complexity,
    },
    /// Turn a description into a regular expression
    Regex {
        description: String,
        #[arg(long = "test", help = "Sample the pattern must match")]
        test_string: String,
    },
    /// Refactor code; the language is auto-detected when omitted
    Simplify {
        code: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    /// Identify the programming language of a snippet
    DetectLanguage {
        code: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Translate a schedule description into a cron expression
    Cron { description: String },
    /// Cast a JSON document into type definitions
    JsonToTypes {
        json: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long, default_value = "TypeScript")]
        language: String,
    },
    /// Write a README.md for a project description
    Readme {
        project_info: String,
        #[arg(long, default_value = DEFAULT_README_STYLE)]
        style: String,
    },
    /// Write a commit message for a summary of changes
    Commit {
        changes: String,
        #[arg(long, default_value = "Conventional Commits")]
        style: String,
    },
    /// Convert SQL into a NoSQL equivalent
    SqlToNosql {
        sql: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long, default_value = "MongoDB")]
        target: String,
    },
    /// Render a 16:9 Open Graph image for a project
    OgImage {
        title: String,
        #[arg(long, default_value = "")]
        subtitle: String,
        #[arg(long, default_value = "")]
        tech: String,
    },
    /// Print the git commands that push a new project to GitHub
    Onboard { repo_url: Option<String> },
    /// List the suggested languages, styles and targets
    Options,
    /// Show which API key would be used and where it came from
    Key,
}

/// Inline text or a file to read it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub inline: Option<String>,
    pub file: Option<String>,
}

/// Commands answered locally, without an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand<'a> {
    Onboard { repo_url: Option<&'a str> },
    Options,
    Key,
}

impl Command {
    pub fn as_local(&self) -> Option<LocalCommand<'_>> {
        match self {
            Command::Onboard { repo_url } => Some(LocalCommand::Onboard {
                repo_url: repo_url.as_deref(),
            }),
            Command::Options => Some(LocalCommand::Options),
            Command::Key => Some(LocalCommand::Key),
            _ => None,
        }
    }

    /// Input that may come from `--file`, for the commands that accept one.
    pub fn input_source(&self) -> Option<InputSource> {
        let (inline, file) = match self {
            Command::Simplify { code, file, .. } | Command::DetectLanguage { code, file } => {
                (code, file)
            }
            Command::JsonToTypes { json, file, .. } => (json, file),
            Command::SqlToNosql { sql, file, .. } => (sql, file),
            _ => return None,
        };
        Some(InputSource {
            inline: inline.clone(),
            file: file.clone(),
        })
    }

    /// Builds the tool command; `input` is the resolved inline/file text.
    pub fn into_tool_command(self, input: Option<String>) -> Option<ToolCommand> {
        let input = input.unwrap_or_default();
        let command = match self {
            Command::MockData {
                topic,
                format,
                count,
                complexity,
            } => ToolCommand::MockData(MockDataRequest {
                topic,
                format,
                count,
                complexity,
            }),
            Command::Regex {
                description,
                test_string,
            } => ToolCommand::Regex {
                description,
                test_string,
            },
            Command::Simplify { language, .. } => ToolCommand::Simplify {
                code: input,
                language,
            },
            Command::DetectLanguage { .. } => ToolCommand::DetectLanguage { code: input },
            Command::Cron { description } => ToolCommand::Cron { description },
            Command::JsonToTypes { language, .. } => ToolCommand::JsonToTypes {
                json: input,
                language,
            },
            Command::Readme {
                project_info,
                style,
            } => ToolCommand::Readme {
                project_info,
                style,
            },
            Command::Commit { changes, style } => ToolCommand::CommitMessage { changes, style },
            Command::SqlToNosql { target, .. } => ToolCommand::SqlToNoSql { sql: input, target },
            Command::OgImage {
                title,
                subtitle,
                tech,
            } => ToolCommand::OgImage {
                title,
                subtitle,
                tech,
            },
            Command::Onboard { .. } | Command::Options | Command::Key => return None,
        };
        Some(command)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        if let Some(InputSource {
            file: Some(file), ..
        }) = self.command.input_source()
        {
            validate_path("file", &file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mock_data_defaults() {
        let config = CliConfig::parse_from(["allnoop", "mock-data", "users"]);
        let command = config.command.into_tool_command(None).unwrap();

        assert_eq!(
            command,
            ToolCommand::MockData(MockDataRequest {
                topic: "users".to_string(),
                format: MockFormat::Json,
                count: 10,
                complexity: Complexity::Simple,
            })
        );
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let config = CliConfig::parse_from([
            "allnoop",
            "mock-data",
            "orders",
            "--format",
            "csv",
            "--count",
            "25",
            "--complexity",
            "complex",
            "--output",
            "orders.csv",
            "--api-key",
            "k",
        ]);

        assert_eq!(config.output.as_deref(), Some("orders.csv"));
        assert_eq!(config.api_key.as_deref(), Some("k"));
        match config.command {
            Command::MockData {
                format,
                count,
                complexity,
                ..
            } => {
                assert_eq!(format, MockFormat::Csv);
                assert_eq!(count, 25);
                assert_eq!(complexity, Complexity::Complex);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_file_input_commands() {
        let config = CliConfig::parse_from(["allnoop", "sql-to-nosql", "--file", "q.sql"]);
        assert_eq!(
            config.command.input_source(),
            Some(InputSource {
                inline: None,
                file: Some("q.sql".to_string()),
            })
        );

        let command = config
            .command
            .into_tool_command(Some("SELECT 1".to_string()))
            .unwrap();
        assert_eq!(
            command,
            ToolCommand::SqlToNoSql {
                sql: "SELECT 1".to_string(),
                target: "MongoDB".to_string(),
            }
        );
    }

    #[test]
    fn test_local_commands() {
        let config = CliConfig::parse_from(["allnoop", "onboard"]);
        assert_eq!(
            config.command.as_local(),
            Some(LocalCommand::Onboard { repo_url: None })
        );
        assert!(config.command.into_tool_command(None).is_none());

        let config = CliConfig::parse_from([
            "allnoop",
            "onboard",
            "https://github.com/acme/widgets.git",
        ]);
        assert_eq!(
            config.command.as_local(),
            Some(LocalCommand::Onboard {
                repo_url: Some("https://github.com/acme/widgets.git")
            })
        );

        let config = CliConfig::parse_from(["allnoop", "key"]);
        assert_eq!(config.command.as_local(), Some(LocalCommand::Key));

        let config = CliConfig::parse_from(["allnoop", "cron", "every day at noon"]);
        assert!(config.command.as_local().is_none());
    }

    #[test]
    fn test_validate_rejects_empty_output() {
        let config = CliConfig::parse_from(["allnoop", "key", "--output", ""]);
        assert!(config.validate().is_err());
    }
}
