use clap::Parser;
use std::process::ExitCode;

use h264_udp_streamer::cli::Cli;
use h264_udp_streamer::{streamer, GstFramework};

/// What `return -1` from main looks like to the shell
const FAILURE_EXIT_CODE: u8 = 255;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a handler the only way out is being killed
        log::error!("Cannot listen for Ctrl+C ({}), streaming until killed", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    log::debug!("Starting with {:?}", config);

    match streamer::run(&config, GstFramework::init, shutdown_signal()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}
