//! Echo Chamber — arithmetic sequence predictor.
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! runs one of the front-ends: the interactive REPL (default), the JSON
//! HTTP server, or the one-shot self-check.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use echo_chamber::config::AppConfig;
use echo_chamber::messages;
use echo_chamber::predictor::selftest;
use echo_chamber::predictor::SequencePredictor;
use echo_chamber::repl::Repl;
use echo_chamber::server::{self, ServerState};
use echo_chamber::types::Locale;

const BANNER: &str = r#"
  _____     _             ____ _                     _
 | ____|___| |__   ___   / ___| |__   __ _ _ __ ___ | |__   ___ _ __
 |  _| / __| '_ \ / _ \ | |   | '_ \ / _` | '_ ` _ \| '_ \ / _ \ '__|
 | |__| (__| | | | (_) || |___| | | | (_| | | | | | | |_) |  __/ |
 |_____\___|_| |_|\___/  \____|_| |_|\__,_|_| |_| |_|_.__/ \___|_|
"#;

#[derive(Parser)]
#[command(name = "echo-chamber", version, about = "Predict the next number of an arithmetic sequence.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Message language (en, es); overrides the config file
    #[arg(short, long)]
    locale: Option<Locale>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive prompt (default)
    Repl,
    /// Serve the JSON API
    Serve {
        /// Listen address; overrides the config file
        #[arg(long)]
        host: Option<String>,
        /// Listen port; overrides the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the built-in samples and exit non-zero on any failure
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let (mut cfg, source) = AppConfig::load_or_default(&cli.config)?;
    if let Some(locale) = cli.locale {
        cfg.general.locale = locale;
    }

    init_logging(&cfg);
    source.log(&cli.config);

    let locale = cfg.general.locale;
    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            println!("{BANNER}");
            run_repl(locale).await
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                cfg.server.host = host;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            println!("{BANNER}");
            info!(addr = %cfg.bind_addr(), %locale, "Echo Chamber server starting up");

            let state = Arc::new(ServerState::new(SequencePredictor::new(), locale));
            server::serve(state, &cfg.bind_addr()).await
        }
        Command::Check => run_check(locale),
    }
}

/// Run the REPL on stdin/stdout.
///
/// Terminal I/O blocks, so the loop runs on the blocking pool.
async fn run_repl(locale: Locale) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut predictor = SequencePredictor::new();
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let result = Repl::new(stdin.lock(), stdout.lock(), &mut predictor, locale).run();
        info!(predictions = predictor.len(), "REPL session ended");
        result
    })
    .await
    .context("REPL task panicked")?
}

fn run_check(locale: Locale) -> Result<()> {
    let report = selftest::run_self_check(locale);
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "{}",
        messages::success_rate(locale, report.passed, report.failed, report.success_rate())
    );

    if !report.all_passed() {
        warn!(failed = report.failed, "Self-check failed");
        anyhow::bail!("{} self-check case(s) failed", report.failed);
    }
    Ok(())
}

/// Initialise the `tracing` subscriber.
///
/// Logs go to stderr so they never interleave with REPL output.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));

    let json_logging = cfg.logging.json || std::env::var("ECHO_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
