use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use atlas::core::config;
use atlas::tui;

#[derive(Parser)]
#[command(name = "atlas", about = "Terminal country explorer")]
struct Args {
    /// Country API base URL (overrides config file and ATLAS_API_BASE_URL)
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to atlas.log in current directory
    // (the TUI owns stdout, so nothing may log to the terminal)
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("atlas.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Config unusable ({e}), falling back to defaults");
        config::AtlasConfig::default()
    });
    let resolved = config::resolve(&file_config, args.endpoint.as_deref());

    log::info!("Atlas starting up (endpoint: {})", resolved.base_url);

    tui::run(resolved)
}
