use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use daybook::ai::{self, Categorizer, PromptGenerator};
use daybook::config::DaybookConfig;
use daybook::server;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Journaling service with model-assisted categorization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Categorize a single piece of text and print the result as JSON
    Categorize {
        /// Text to categorize
        text: String,
    },
    /// Print reflection prompts, optionally seeded with some context
    Prompts {
        /// Recent journal text to base the questions on
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = DaybookConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Categorize { text } => {
            anyhow::ensure!(!text.trim().is_empty(), "text must not be empty");
            let client = ai::create_client(&config.ai)?;
            let verdict = client.categorize(&text).await?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::Prompts { context } => {
            let client = ai::create_client(&config.ai)?;
            let questions = client.generate_prompts(context.as_deref()).await?;
            for q in questions {
                println!("- {q}");
            }
        }
    }

    Ok(())
}
