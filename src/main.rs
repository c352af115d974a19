use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dining::{install_signal_handler, Dinner, LogNotify, Pace, Shutdown};

#[derive(Debug, Parser)]
#[command(name = "dining", about = "Dining philosophers simulation")]
struct Args {
    /// Number of philosophers
    #[arg(allow_negative_numbers = true)]
    count: i64,

    /// Length of one time unit in milliseconds (think 1-2 units, eat 1-3 units)
    #[arg(long, default_value_t = 1000)]
    unit_ms: u64,

    /// Log fork requests and releases
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Ctrl-C で終了フラグを立てる
    let shutdown = Shutdown::new();
    install_signal_handler(shutdown.clone()).context("installing signal handler")?;

    let pace = Pace::with_unit(Duration::from_millis(args.unit_ms));
    let dinner = Dinner::start(args.count, pace, Arc::new(LogNotify), shutdown)
        .context("starting the dinner")?;

    let states = dinner.join()?;
    debug!(?states, "final states");
    info!("exiting program");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,dining=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
