use std::{io, path::PathBuf, process, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use console::{menu, Console, Demonstrations, Interrupt};
use storage::SqlxProbe;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

/// Exit status used when Ctrl-C arrives outside a pause.
const SIGINT_EXIT_CODE: i32 = 130;

#[derive(Parser, Debug)]
#[command(name = "faultmenu", about = "Trigger common runtime faults and see them handled")]
struct Args {
    /// Settings file; defaults to ./faultmenu.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `console=trace`. Logs go to stderr.
    #[arg(long)]
    log: Option<String>,
    /// Seconds to wait for a database connection before giving up.
    #[arg(long)]
    connect_timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(log) = args.log {
        settings.log_filter = log;
    }
    if let Some(secs) = args.connect_timeout_secs {
        settings.connect_timeout_secs = secs;
    }

    let filter = EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let interrupt = Interrupt::new();
    runtime.spawn(forward_ctrl_c(interrupt.clone()));

    let probe = Arc::new(SqlxProbe::new(settings.connect_timeout()));
    let demos = Demonstrations::new(runtime.handle().clone(), probe, interrupt);

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    let summary = menu::run(&mut console, &demos)?;
    info!(exit = ?summary.exit, dispatched = summary.dispatched, "menu finished");

    Ok(())
}

/// Ctrl-C cuts a running pause short; anywhere else it ends the process.
async fn forward_ctrl_c(interrupt: Interrupt) {
    loop {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "unable to listen for ctrl-c");
            return;
        }
        if !interrupt.raise() {
            process::exit(SIGINT_EXIT_CODE);
        }
    }
}
