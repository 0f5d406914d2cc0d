use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{error, info};

use taskflow::{config::ServerConfig, rest, storage::TaskStore};

#[derive(Parser)]
#[command(name = "taskflow", about = "TaskFlow — task list API + web page", version)]
struct Args {
    /// HTTP listen port
    #[arg(long, env = "TASKFLOW_PORT")]
    port: Option<u16>,

    /// Directory for the SQLite database
    #[arg(long, env = "TASKFLOW_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKFLOW_LOG")]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::new(args.port, args.data_dir, args.log);

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.clone())
        .compact()
        .init();

    // An unreachable store is fatal: never serve in a degraded mode.
    let store = match TaskStore::open(&config.data_dir).await {
        Ok(store) => store,
        Err(err) => {
            error!("failed to open task store: {err:#}");
            return Err(err).context("startup aborted");
        }
    };
    info!("task store ready at {}", config.data_dir.display());

    rest::serve(store, config.port).await
}
