#![cfg(not(tarpaulin_include))]

use fotosys::app;
use fotosys::config::AppConfig;
use std::env;

/// Main entry point for the dashboard server.
///
/// Reads the optional configuration-file path from the first command line
/// argument (default `config.json`; a missing file means defaults) and
/// starts the web application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or("config.json");

    let config = AppConfig::load(config_path)?;
    app::run(config).await
}
