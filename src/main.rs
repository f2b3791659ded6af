use allnoop::config::cli::LocalCommand;
use allnoop::core::ConfigProvider;
use allnoop::domain::model::{
    CODE_LANGUAGES, COMMIT_STYLES, NOSQL_TARGETS, README_STYLES, TYPE_LANGUAGES,
};
use allnoop::utils::{logger, validation::Validate};
use allnoop::{
    AllNoopError, CliConfig, Delivery, GeminiClient, GitOnboarding, KeyResolver, LocalStorage,
    Settings, ToolRunner, Toolkit,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting allnoop CLI");
    if config.verbose {
        tracing::debug!("CLI command: {:?}", config.command);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn run(config: CliConfig) -> Result<(), AllNoopError> {
    config.validate()?;

    let settings = Settings::load(config.config.as_deref())?;
    settings.validate()?;

    let resolver = KeyResolver::standard(config.api_key.clone(), settings.api_key());

    if let Some(local) = config.command.as_local() {
        run_local(local, &resolver);
        return Ok(());
    }

    let api_key = resolver.require()?;
    let client = GeminiClient::from_config(api_key, &settings)?;
    tracing::debug!(
        "Using {} (text: {}, image: {})",
        settings.base_url(),
        settings.text_model(),
        settings.image_model()
    );

    let runner = ToolRunner::new(
        Toolkit::from_config(client, &settings),
        LocalStorage::default(),
    );

    let input = match config.command.input_source() {
        Some(source) => Some(
            runner
                .load_input(source.inline, source.file.as_deref())
                .await?,
        ),
        None => None,
    };

    let Some(command) = config.command.into_tool_command(input) else {
        return Ok(());
    };

    match runner.run(command, config.output.as_deref()).await? {
        Delivery::Printed(text) => println!("{}", text),
        Delivery::Saved(path) => {
            tracing::info!("📁 Output saved to: {}", path);
            println!("📁 Output saved to: {}", path);
        }
    }

    Ok(())
}

fn run_local(command: LocalCommand<'_>, resolver: &KeyResolver) {
    match command {
        LocalCommand::Onboard { repo_url } => {
            let onboarding = GitOnboarding::new(repo_url);
            tracing::info!("Preparing push commands for {}", onboarding.repo_name());
            println!("{}", onboarding.commands());
        }
        LocalCommand::Options => {
            print_catalog("Code languages", CODE_LANGUAGES);
            print_catalog("Type definition languages", TYPE_LANGUAGES);
            print_catalog("README styles", README_STYLES);
            print_catalog("Commit styles", COMMIT_STYLES);
            print_catalog("NoSQL targets", NOSQL_TARGETS);
        }
        LocalCommand::Key => match resolver.resolve() {
            Some(key) => println!("✅ API key {} from {}", key.masked(), key.source()),
            None => println!("⚠️  No API key configured"),
        },
    }
}

fn print_catalog(title: &str, entries: &[&str]) {
    println!("{}:", title);
    for entry in entries {
        println!("  - {}", entry);
    }
}
