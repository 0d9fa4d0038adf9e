//! Weather observer
//!
//! Reports current conditions for the machine's city or a list of targets,
//! once or at fixed local hours, to the console, a markdown document or
//! telegram.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use wobs_cli::{build_observer, Args, Scheduler};
use wobs_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    wobs_obs::init("observer", args.verbose);

    let Some(api_key) = args.api_key() else {
        error!("API key was not provided");
        bail!("missing API key: pass --api-key or set {}", wobs_cli::args::API_KEY_ENV);
    };

    let config = AppConfig::load().context("Failed to load configuration")?;
    let started = chrono::Local::now().naive_local();
    let (mut observer, selector) = build_observer(&args, &config, api_key, started)?;

    info!(sink = observer.sink_name(), recurring = args.recurring(), "Starting up...");

    if !args.recurring() {
        match selector.load_targets().await {
            Ok(targets) => {
                observer.observe_all(&targets).await;
            }
            Err(e) => error!(error = %e, "cannot load targets"),
        }
        return Ok(());
    }

    let mut scheduler = Scheduler::new(
        observer,
        config.report_hours()?,
        config.max_sleep(),
        config.retry_interval(),
    );

    tokio::select! {
        result = scheduler.run(selector.as_ref()) => result?,
        _ = shutdown_signal() => info!("Shutdown signal received"),
    }

    info!("Observer stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
