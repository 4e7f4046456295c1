mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pmp",
    about = "PMP project health: compliance scoring, EVM and knowledge-area assessments",
    version,
    propagate_version = true
)]
struct Cli {
    /// Service config file
    #[arg(long, global = true, env = "PMP_CONFIG", default_value = "pmp.yaml")]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Full compliance report for one process group
    Compliance {
        /// Project record (JSON)
        file: PathBuf,
        /// Process group, e.g. Planning or Monitoring_Controlling
        #[arg(long)]
        phase: String,
    },

    /// Checklist status for all five process groups
    Status {
        /// Project record (JSON)
        file: PathBuf,
    },

    /// Field coverage for the ten knowledge areas
    Knowledge {
        /// Project record (JSON)
        file: PathBuf,
        /// Assess one area only, e.g. risk or stakeholder
        #[arg(long)]
        area: Option<String>,
    },

    /// Earned value figures and health labels
    Evm {
        /// Project record or bare budget object (JSON)
        file: PathBuf,
    },

    /// Check the service config for common mistakes
    Check,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve { port } => cmd::serve::run(&cli.config, port),
        Commands::Compliance { file, phase } => cmd::compliance::run(&file, &phase, cli.json),
        Commands::Status { file } => cmd::status::run(&file, cli.json),
        Commands::Knowledge { file, area } => {
            cmd::knowledge::run(&file, area.as_deref(), cli.json)
        }
        Commands::Evm { file } => cmd::evm::run(&file, cli.json),
        Commands::Check => cmd::check::run(&cli.config, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
