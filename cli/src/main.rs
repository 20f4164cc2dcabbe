use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use client::net::config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENGINE_URL, DEFAULT_READ_PATH, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use client::state::angle::AngleRejection;
use client::util::pointer::{PointerHub, Region};
use client::{ConfigError, EngineConfig, EngineError, EngineTimeouts, HttpEngine, QubitSession};
use tracing_subscriber::EnvFilter;
use wire::{GateName, WireError};


mod output;
mod repl;

use output::OutputFormat;

/// Where the angle popover sits in session coordinates. Clicks outside it
/// close the panel.
const PANEL_REGION: Region = Region::new(0.0, 0.0, 40.0, 12.0);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("engine request failed: {}", .0.user_message())]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("invalid angle: {0}")]
    Angle(#[from] AngleRejection),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "qubit", about = "Single-qubit state visualizer client")]
struct Cli {
    #[arg(long, env = "QUBIT_ENGINE_URL", default_value = DEFAULT_ENGINE_URL)]
    engine_url: String,

    #[arg(long, env = "QUBIT_READ_PATH", default_value = DEFAULT_READ_PATH)]
    read_path: String,

    /// Whole-request timeout in seconds, 0 for none.
    #[arg(long, env = "QUBIT_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "QUBIT_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the engine's current state.
    State,
    /// Apply one gate and print the resulting state.
    Gate {
        name: String,
        /// Angle in radians for p, r_x and r_y (at most 4 characters).
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<String>,
    },
    /// Return the qubit to |0⟩.
    Reset,
    /// List the gate vocabulary.
    Gates,
    /// Interactive session over stdin.
    Session,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(diagnostic) = diagnostic(&err) {
                tracing::debug!(diagnostic, "engine diagnostic");
            }
            eprintln!("{}", error_line(&err));
            ExitCode::FAILURE
        }
    }
}

/// What the user sees for a failed command. Engine diagnostics are left to
/// the debug log.
fn error_line(err: &CliError) -> String {
    format!("error: {err}")
}

fn diagnostic(err: &CliError) -> Option<&str> {
    match err {
        CliError::Engine(engine) => engine.diagnostic(),
        _ => None,
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let hub = PointerHub::new();

    match cli.command {
        Command::Gates => output::print_gates(cli.format),
        Command::State => {
            let session = connect(&cli, &hub)?;
            session.mount().await?;
            output::print_view(&session.view().await, cli.format)
        }
        Command::Gate { ref name, ref angle } => {
            let mut session = connect(&cli, &hub)?;
            let gate = parse_gate(name)?;
            match angle {
                Some(raw) if gate.is_parametric() => session.angle_input_mut().try_set(raw)?,
                Some(_) => tracing::warn!(gate = %gate, "angle ignored for a gate without one"),
                None => {}
            }
            session.apply_gate(gate).await?;
            output::print_view(&session.view().await, cli.format)
        }
        Command::Reset => {
            let session = connect(&cli, &hub)?;
            session.reset().await?;
            output::print_view(&session.view().await, cli.format)
        }
        Command::Session => {
            let session = connect(&cli, &hub)?;
            repl::run(session, &hub, cli.format).await
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn connect(cli: &Cli, hub: &PointerHub) -> Result<QubitSession, CliError> {
    let config = EngineConfig::new(&cli.engine_url)?
        .with_read_path(&cli.read_path)?
        .with_timeouts(EngineTimeouts {
            request_secs: cli.timeout_secs,
            connect_secs: cli.connect_timeout_secs,
        });
    let engine = HttpEngine::new(&config)?;
    tracing::debug!(read_url = %config.read_url(), gate_url = %config.gate_url(), "engine configured");
    Ok(QubitSession::new(Arc::new(engine), hub, PANEL_REGION))
}

fn parse_gate(name: &str) -> Result<GateName, CliError> {
    Ok(name.trim().to_ascii_lowercase().parse::<GateName>()?)
}
