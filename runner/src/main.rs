//! canary: runs one canary check and reports pass or fail.
//!
//! Loads `.env` if present, initializes tracing, reads the canary
//! configuration from the environment at call time, builds the requested
//! check, runs it through `canary_core::handler`, and exits 0 on success or
//! 1 on failure.

mod outcome;
mod registry;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canary_core::{handler, CanaryConfig, CheckError, TracingLog};
use outcome::CheckOutcome;
use registry::{build_check, CheckKind};

const DEFAULT_LOG_FILTER: &str = "canary=info,canary_core=info";

/// Run canary health checks
#[derive(Parser, Debug)]
#[command(name = "canary", version, about)]
struct Args {
    /// Log level filter (e.g., "canary=debug")
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single check
    Run {
        check: CheckKind,

        /// Print the outcome as JSON instead of the bare message
        #[arg(long)]
        json: bool,

        /// Directory for page screenshots
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,
    },
    /// List available checks and the environment keys they read
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_level, args.log_format);

    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!(error = %err, "Ignoring unreadable .env file");
        }
    }

    match args.command {
        Command::List => {
            for kind in CheckKind::value_variants() {
                println!("{:<12} {}", kind.name(), kind.keys().join(", "));
            }
            ExitCode::SUCCESS
        }
        Command::Run {
            check,
            json,
            artifacts,
        } => {
            let outcome = run(check, &artifacts).await;
            report(&outcome, json);
            if outcome.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Initialize tracing with priority: CLI > env > default.
fn init_tracing(log_level: Option<String>, format: LogFormat) {
    let filter = log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let json = format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&filter))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn run(kind: CheckKind, artifacts: &Path) -> CheckOutcome {
    let started = Instant::now();
    let result = match CanaryConfig::from_env() {
        Ok(config) => run_with_config(kind, &config, artifacts).await,
        Err(err) => Err(err),
    };
    CheckOutcome::new(kind.name(), &result, started.elapsed())
}

async fn run_with_config(
    kind: CheckKind,
    config: &CanaryConfig,
    artifacts: &Path,
) -> Result<String, CheckError> {
    let check = build_check(kind, config, artifacts, Arc::new(TracingLog))?;
    tracing::debug!(check = check.name(), "Running check");
    handler(check.as_ref()).await
}

fn report(outcome: &CheckOutcome, json: bool) {
    if json {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::error!(error = %err, "Failed to serialize outcome"),
        }
        return;
    }

    if outcome.passed() {
        println!("{}", outcome.message);
    } else {
        tracing::error!(
            check = %outcome.check,
            kind = outcome.error_kind.unwrap_or("unknown"),
            "Check failed"
        );
        eprintln!("{}", outcome.message);
    }
}
