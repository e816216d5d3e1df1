use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use trialkeeper::{Result, TrialkeeperConfig};

#[derive(Parser)]
#[command(name = "trialkeeper")]
#[command(author = "Chris Cheng <chris.cheng@shopee.com>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Trial window and entitlement manager", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding trial state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Evaluate as of this instant instead of now (RFC 3339)
    #[arg(long, global = true)]
    at: Option<DateTime<Utc>>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new trial (replaces any existing one)
    Start,

    /// Show the current trial status
    Status {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show the trial status, starting a trial if none exists
    Ensure {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Check gated access (exit code 0 granted, 2 denied)
    Access {
        /// Only set the exit code
        #[arg(short, long)]
        quiet: bool,
    },

    /// End the current trial early
    End,

    /// Erase the trial and its milestones
    Reset,

    /// Show the last cached status without recomputing
    Cached {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show recorded analytics events
    Events {
        /// Only show the last N events
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Write the effective configuration to <data-dir>/config.toml
    InitConfig,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = TrialkeeperConfig::load(cli.config.as_deref(), cli.data_dir.as_deref())?;
    trialkeeper::logging::init(cli.verbose, &config.log_level);
    tracing::debug!(data_dir = %config.data_dir.display(), namespace = %config.namespace, "loaded config");

    let mut manager = trialkeeper::cli::open_manager(&config, cli.at);

    match cli.command {
        Commands::Start => {
            trialkeeper::cli::lifecycle::run_start(&mut manager)?;
        }

        Commands::Status { json } => {
            trialkeeper::cli::status::run(&mut manager, json)?;
        }

        Commands::Ensure { json } => {
            trialkeeper::cli::status::run_ensure(&mut manager, json)?;
        }

        Commands::Access { quiet } => {
            if !trialkeeper::cli::access::run(&mut manager, quiet)? {
                return Ok(2);
            }
        }

        Commands::End => {
            trialkeeper::cli::lifecycle::run_end(&mut manager)?;
        }

        Commands::Reset => {
            trialkeeper::cli::lifecycle::run_reset(&mut manager)?;
        }

        Commands::Cached { json } => {
            trialkeeper::cli::status::run_cached(&manager, json)?;
        }

        Commands::Events { limit, json } => {
            trialkeeper::cli::events::run(&config, limit, json)?;
        }

        Commands::InitConfig => {
            let path = config.save()?;
            println!("{}", format!("📝 Wrote {}", path.display()).green());
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "trialkeeper", &mut io::stdout());
        }
    }

    Ok(0)
}
