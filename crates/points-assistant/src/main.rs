//! Points Chess assistant.
//!
//! Reads commands from stdin and answers on stdout. Diagnostics go to stderr
//! and are filtered with `RUST_LOG` (default `warn`).

mod board;
mod command;
mod session;

use anyhow::Context;
use clap::Parser;
use points_engine::EngineConfig;
use session::Session;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Points Chess assistant - set up positions, play, and ask for suggestions.
#[derive(Parser)]
#[command(name = "points-assistant")]
#[command(about = "Interactive assistant for Points Chess")]
struct Args {
    /// Configuration file; a missing file means built-in defaults
    #[arg(long, default_value = EngineConfig::FILE_NAME)]
    config: PathBuf,

    /// Moves each side may make before the game is scored
    #[arg(long)]
    max_moves: Option<u32>,

    /// Default thinking time in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Deepest search iteration
    #[arg(long)]
    max_depth: Option<u32>,

    /// Start from this position instead of the standard one
    #[arg(long)]
    fen: Option<String>,
}

impl Args {
    /// File values overridden by command-line flags.
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = EngineConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(max_moves) = self.max_moves {
            config.max_moves = max_moves;
        }
        if let Some(ms) = self.time_limit_ms {
            config.time_limit_ms = ms;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let config = args.engine_config()?;
    tracing::info!(?config, "configuration loaded");

    let stdout = io::stdout();
    let mut session = match &args.fen {
        Some(fen) => Session::from_fen(config, fen, stdout.lock())
            .with_context(|| format!("invalid --fen '{fen}'"))?,
        None => Session::new(config, stdout.lock()),
    };
    session.run(io::stdin().lock())?;
    Ok(())
}
