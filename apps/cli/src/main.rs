mod config;
mod main_lib;

use config::Config;
use main_lib::{init_tracing, run, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    tracing::debug!("Using mapping directory {}", config.data_dir);
    run(&config, command).await
}
