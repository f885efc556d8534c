use clap::{Parser, Subcommand, builder::styling};
use etl_pipelines::cli;
use eyre::Result;
use owo_colors::OwoColorize;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Staged ETL pipelines: toll-data consolidation and the largest-banks market-cap report
#[derive(Parser)]
#[command(name = "etlp", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source run configuration from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered workflows
    List,

    /// Print a workflow's stages and metadata as JSON
    Inspect {
        /// Workflow id, e.g. etl_toll_data
        workflow: String,
    },

    /// Run a workflow to completion
    Trigger {
        /// Workflow id, e.g. etl_banks
        workflow: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match dotenvy::from_filename(&cli.env) {
        Ok(_) => {}
        Err(error) if error.not_found() => {}
        Err(error) => return Err(error.into()),
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::List => {
            for spec in cli::workflow_specs()? {
                println!("{}  {}", spec.id.green(), spec.description.bright_black());
            }
        }
        Commands::Inspect { workflow } => {
            let spec = cli::inspect_workflow(&workflow)?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }
        Commands::Trigger { workflow } => {
            log::info!("Triggering workflow {}", workflow.green());
            cli::trigger_workflow(&workflow).await?;
            log::info!("✓ Workflow {} complete", workflow.green());
        }
    }

    Ok(())
}
