//! `proverd` — protocol front end of the proof-computation worker.
//!
//! Wires the configuration, the shared job registry and the host-facts
//! provider into a session task, then supervises it until ctrl-c or an
//! unrecoverable registry error.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use proverd_config::Config;
use proverd_registry::JobRegistry;
use proverd_session::{Dispatcher, RetryPolicy, StreamSession, SystemFacts};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the orchestrator address (`host:port`).
    #[arg(long, value_name = "ADDR")]
    orchestrator: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    init_logging(&config.logging.filter);

    let addr = args
        .orchestrator
        .unwrap_or_else(|| config.orchestrator.addr());
    let prover_id = config.session.prover_id();

    info!(prover_id = %prover_id, orchestrator = %addr, "Starting proverd");

    let registry = Arc::new(JobRegistry::new(config.session.max_tracked_jobs));
    let host = Arc::new(SystemFacts::new());
    let dispatcher = Dispatcher::new(registry, host, prover_id);
    let session = StreamSession::new(
        addr,
        dispatcher,
        RetryPolicy::with_delay(config.session.reconnect_delay),
    );

    let mut session_task = tokio::spawn(session.run());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
            session_task.abort();
        }
        result = &mut session_task => {
            match result {
                Ok(Err(e)) => return Err(e.into()),
                Ok(Ok(())) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
