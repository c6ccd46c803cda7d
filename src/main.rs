use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use stepwise::config;
use stepwise::host::{ConsoleHost, ScriptedHost, Theme};
use stepwise::logging::{self, DEFAULT_LOG_LEVEL};
use stepwise::state::demo::demo_steps;
use stepwise::{Step, StepResult, run};

#[derive(Parser)]
#[command(name = "stepwise", version, about = "Multi-step prompt wizard")]
struct Cli {
    /// Log level for stderr output (RUST_LOG overrides it)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick an item, then enter a username and a password
    Demo {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Run the steps defined in a YAML flow file
    Run {
        /// Path to the flow file
        flow: PathBuf,

        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(clap::Args)]
struct IoArgs {
    /// Replay user actions from a YAML script instead of prompting
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output format for the collected results
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_logging(&cli.log_level) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match execute(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every step was completed.
async fn execute(command: Commands) -> Result<bool> {
    let (mut steps, io) = match command {
        Commands::Demo { io } => (demo_steps(), io),
        Commands::Run { flow, io } => {
            let steps = config::load_flow(&flow)
                .with_context(|| format!("failed to load flow {}", flow.display()))?;
            (steps, io)
        }
    };

    let results = collect(&mut steps, io.script.as_deref()).await?;
    match results {
        Some(results) => {
            print_results(&results, io.format)?;
            Ok(true)
        }
        None => {
            tracing::info!("wizard cancelled");
            Ok(false)
        }
    }
}

async fn collect(
    steps: &mut [Step],
    script: Option<&Path>,
) -> Result<Option<Vec<StepResult>>> {
    if let Some(path) = script {
        let actions = config::load_script(path)
            .with_context(|| format!("failed to load script {}", path.display()))?;
        let mut host = ScriptedHost::new(actions);
        return Ok(run(&mut host, steps).await?);
    }

    let theme = if io::stdout().is_terminal() {
        Theme::default_theme()
    } else {
        Theme::plain()
    };
    let mut host = ConsoleHost::stdio().with_theme(theme);
    Ok(run(&mut host, steps).await?)
}

fn print_results(results: &[StepResult], format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(results)?,
        OutputFormat::Yaml => serde_yaml::to_string(results)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
