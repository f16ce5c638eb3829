//! Visualmaker CLI - headless diagram editor

mod cli;
mod listing;

use clap::Parser;
use visualmaker::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Explicit flags win; otherwise VISUALMAKER_LOG_* and RUST_LOG apply
    let level = cli_args
        .log_level
        .map(|level| level.as_str())
        .or(cli_args.verbose.then_some("debug"));
    let format = cli_args.log_format.map(|format| format.as_str());
    if let Err(e) = init_logging(level, format) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let result = cli::VisualmakerApp::from_config_path(cli_args.config.as_deref())
        .and_then(|app| app.run(cli_args));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
