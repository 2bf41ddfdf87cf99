use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use pricewatch_common::observability::init_logging;
use pricewatch_config::PricewatchConfigLoader;
use pricewatch_runtime::ServerRuntime;
mod server;

const DEFAULT_CONFIG_FILE: &str = "pricewatch.yaml";

/// Serve the depreciated price of a retailer's product page at `GET /device`.
#[derive(Debug, Parser)]
#[command(name = "pricewatch", version)]
struct Cli {
    /// Config file (YAML). Without it, `pricewatch.yaml` is used if present.
    #[arg(long, env = "PRICEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Override `server.listen`.
    #[arg(long)]
    listen: Option<String>,

    /// Tokio worker threads (defaults to the number of cores).
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Env overrides are applied on top of the file inside `load`.
    let loader = match &cli.config {
        Some(path) => PricewatchConfigLoader::new().with_file(path),
        None => PricewatchConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = loader.load()?;
    if let Some(listen) = cli.listen {
        cfg.server.listen = listen;
    }

    let log_path = init_logging(cfg.logging.log_config("pricewatch"))?;
    tracing::info!(log_path = %log_path.display(), "pricewatch.starting");

    let runtime = ServerRuntime::build("pricewatch", cli.workers)?;
    runtime.cancel_on_ctrl_c();
    let cancel = runtime.cancellation();

    let result = runtime.block_on(server::run(cfg, cancel));
    if let Err(e) = &result {
        tracing::error!(error = %e, "pricewatch.failed");
    }
    runtime.shutdown(Duration::from_secs(5));
    result
}
