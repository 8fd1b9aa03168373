//! Startup, run and teardown of one stream

use std::future::Future;
use thiserror::Error;

use crate::config::StreamConfig;
use crate::device::{self, DeviceError};
use crate::framework::{FrameworkError, MediaFramework};
use crate::pipeline::{self, PipelineError, RunOutcome};
use crate::profile::StreamProfile;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("failed to initialize media framework: {0}")]
    Init(#[source] FrameworkError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Runs the stream described by `config` until `shutdown` completes.
///
/// The device is checked before `init` is called, so a missing device never
/// initializes the framework. Any failure after that releases whatever was
/// acquired before returning.
pub async fn run<F, I, S>(
    config: &StreamConfig,
    init: I,
    shutdown: S,
) -> Result<RunOutcome, StreamError>
where
    F: MediaFramework,
    I: FnOnce() -> Result<F, FrameworkError>,
    S: Future<Output = ()>,
{
    device::verify_exists(&config.device)?;

    log::info!("IP Address: {}", config.host);
    log::info!("UDP Port: {}", config.port);
    log::info!("Device Path: {}", config.device.display());

    let framework = init().map_err(StreamError::Init)?;
    let profile = StreamProfile::default();

    let assembled = pipeline::assemble(&framework, config, &profile)?;
    let running = assembled.start()?;

    log::info!("Press Ctrl+C to terminate");
    let outcome = running.run_until(shutdown).await?;

    log::info!("Stream stopped ({})", outcome);
    Ok(outcome)
}
