//! Assembly, run and teardown of the five-stage streaming pipeline
//!
//! ```text
//! v4l2src ! video/x-raw,width=640,height=480,framerate=30/1 ! videoconvert
//!     ! x264enc ! rtph264pay ! udpsink
//! ```
//!
//! Assembly walks a fixed sequence of create/configure/link steps. Each step
//! needs the previous one; the first failure aborts and everything acquired
//! so far is released by ownership (stage handles) or by `PipelineGuard`
//! (the container). Lifecycle:
//! `assemble` -> `AssembledPipeline` -> `start` -> `RunningPipeline` -> stopped.

mod guard;

pub use guard::PipelineGuard;

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::fmt;
use std::future::Future;
use thiserror::Error;

use crate::config::StreamConfig;
use crate::framework::{FrameworkError, MediaFramework, PipelineEvent, PipelineState, PropertyValue};
use crate::profile::{CaptureFormat, StreamProfile};

pub const PIPELINE_NAME: &str = "video-pipeline";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Capture,
    Converter,
    Encoder,
    Payloader,
    Sink,
}

impl StageKind {
    pub const ALL: [StageKind; 5] = [
        StageKind::Capture,
        StageKind::Converter,
        StageKind::Encoder,
        StageKind::Payloader,
        StageKind::Sink,
    ];

    /// Element factory the stage is built from
    pub fn factory(self) -> &'static str {
        match self {
            StageKind::Capture => "v4l2src",
            StageKind::Converter => "videoconvert",
            StageKind::Encoder => "x264enc",
            StageKind::Payloader => "rtph264pay",
            StageKind::Sink => "udpsink",
        }
    }

    /// Name given to the element inside the pipeline
    pub fn element_name(self) -> &'static str {
        match self {
            StageKind::Capture => "source",
            StageKind::Converter => "convert",
            StageKind::Encoder => "encoder",
            StageKind::Payloader => "payloader",
            StageKind::Sink => "sink",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to create {stage} element ({factory}): {source}")]
    ElementCreation {
        stage: StageKind,
        factory: &'static str,
        source: FrameworkError,
    },

    #[error("failed to create pipeline: {0}")]
    Container(#[source] FrameworkError),

    #[error("failed to add elements to pipeline: {0}")]
    Add(#[source] FrameworkError),

    #[error("{from} -> {to} link failed: {source}")]
    Link {
        from: StageKind,
        to: StageKind,
        source: FrameworkError,
    },

    #[error("failed to set {property} on {stage}: {source}")]
    Property {
        stage: StageKind,
        property: &'static str,
        source: FrameworkError,
    },

    #[error("failed to set pipeline to {state}: {source}")]
    StateChange {
        state: PipelineState,
        source: FrameworkError,
    },

    #[error("failed to watch pipeline bus: {0}")]
    Bus(#[source] FrameworkError),

    #[error("error from {element}: {message}")]
    Runtime {
        element: String,
        message: String,
        debug: Option<String>,
    },
}

/// How a run that did not fail came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The shutdown future completed (Ctrl+C)
    Interrupted,
    /// The pipeline posted end-of-stream
    EndOfStream,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Interrupted => f.write_str("interrupted"),
            RunOutcome::EndOfStream => f.write_str("end of stream"),
        }
    }
}

/// The five stage handles, in pipeline order
struct Stages<E> {
    capture: E,
    convert: E,
    encoder: E,
    payloader: E,
    sink: E,
}

impl<E> Stages<E> {
    /// Creates every stage or none: on failure the ones already made are dropped
    fn create<F>(framework: &F) -> Result<Self, PipelineError>
    where
        F: MediaFramework<Element = E>,
    {
        Ok(Self {
            capture: make_stage(framework, StageKind::Capture)?,
            convert: make_stage(framework, StageKind::Converter)?,
            encoder: make_stage(framework, StageKind::Encoder)?,
            payloader: make_stage(framework, StageKind::Payloader)?,
            sink: make_stage(framework, StageKind::Sink)?,
        })
    }

    fn all(&self) -> [&E; 5] {
        [
            &self.capture,
            &self.convert,
            &self.encoder,
            &self.payloader,
            &self.sink,
        ]
    }
}

fn make_stage<F: MediaFramework>(
    framework: &F,
    stage: StageKind,
) -> Result<F::Element, PipelineError> {
    framework
        .make_element(stage.factory(), stage.element_name())
        .map_err(|source| PipelineError::ElementCreation {
            stage,
            factory: stage.factory(),
            source,
        })
}

fn configure<F: MediaFramework>(
    framework: &F,
    element: &F::Element,
    stage: StageKind,
    properties: &[(&'static str, PropertyValue)],
) -> Result<(), PipelineError> {
    for &(property, ref value) in properties {
        framework
            .set_property(element, property, value)
            .map_err(|source| PipelineError::Property {
                stage,
                property,
                source,
            })?;
    }
    Ok(())
}

fn link<F: MediaFramework>(
    framework: &F,
    (from, src): (StageKind, &F::Element),
    (to, dest): (StageKind, &F::Element),
    filter: Option<&CaptureFormat>,
) -> Result<(), PipelineError> {
    framework
        .link(src, dest, filter)
        .map_err(|source| PipelineError::Link { from, to, source })?;
    log::debug!("Linked {} -> {}", from, to);
    Ok(())
}

/// Builds, configures and links the pipeline without starting it.
pub fn assemble<'f, F: MediaFramework>(
    framework: &'f F,
    config: &StreamConfig,
    profile: &StreamProfile,
) -> Result<AssembledPipeline<'f, F>, PipelineError> {
    use StageKind::*;

    let stages = Stages::create(framework)?;

    configure(
        framework,
        &stages.capture,
        Capture,
        &[(
            "device",
            PropertyValue::Str(config.device.to_string_lossy().into_owned()),
        )],
    )?;

    let pipeline = framework
        .new_pipeline(PIPELINE_NAME)
        .map_err(PipelineError::Container)?;
    let guard = PipelineGuard::new(framework, pipeline, PIPELINE_NAME);

    framework
        .add_elements(guard.pipeline(), &stages.all())
        .map_err(PipelineError::Add)?;

    link(
        framework,
        (Capture, &stages.capture),
        (Converter, &stages.convert),
        Some(&profile.capture),
    )?;
    link(framework, (Converter, &stages.convert), (Encoder, &stages.encoder), None)?;

    configure(framework, &stages.encoder, Encoder, &profile.encoder.properties())?;

    link(framework, (Encoder, &stages.encoder), (Payloader, &stages.payloader), None)?;

    configure(framework, &stages.payloader, Payloader, &profile.payloader.properties())?;

    link(framework, (Payloader, &stages.payloader), (Sink, &stages.sink), None)?;

    configure(
        framework,
        &stages.sink,
        Sink,
        &[
            ("host", PropertyValue::Str(config.host.clone())),
            ("port", PropertyValue::Int(i32::from(config.port))),
        ],
    )?;

    log::info!(
        "Pipeline assembled: {} -> {}:{} ({}x{} @ {}/{} fps, {} kbit/s)",
        config.device.display(),
        config.host,
        config.port,
        profile.capture.width,
        profile.capture.height,
        profile.capture.framerate_num,
        profile.capture.framerate_den,
        profile.encoder.bitrate
    );

    Ok(AssembledPipeline { guard })
}

/// Fully linked and configured, not yet playing
pub struct AssembledPipeline<'f, F: MediaFramework> {
    guard: PipelineGuard<'f, F>,
}

impl<'f, F: MediaFramework> AssembledPipeline<'f, F> {
    pub fn pipeline(&self) -> &F::Pipeline {
        self.guard.pipeline()
    }

    /// Subscribes to the bus and sets the pipeline to Playing
    pub fn start(self) -> Result<RunningPipeline<'f, F>, PipelineError> {
        let framework = self.guard.framework();

        let events = framework
            .events(self.guard.pipeline())
            .map_err(PipelineError::Bus)?;

        framework
            .set_state(self.guard.pipeline(), PipelineState::Playing)
            .map_err(|source| PipelineError::StateChange {
                state: PipelineState::Playing,
                source,
            })?;

        log::info!("Streaming started");

        Ok(RunningPipeline {
            guard: self.guard,
            events,
        })
    }
}

pub struct RunningPipeline<'f, F: MediaFramework> {
    guard: PipelineGuard<'f, F>,
    events: BoxStream<'static, PipelineEvent>,
}

impl<F: MediaFramework> RunningPipeline<'_, F> {
    /// Streams until `shutdown` completes, the pipeline reaches EOS or posts an
    /// error. The pipeline is stopped and released in every case.
    pub async fn run_until<S>(mut self, shutdown: S) -> Result<RunOutcome, PipelineError>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut bus_open = true;

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Interrupt received, stopping pipeline");
                    break RunOutcome::Interrupted;
                }
                event = self.events.next(), if bus_open => match event {
                    Some(PipelineEvent::Error { element, message, debug }) => {
                        log::error!("[gst] ERROR from {}: {} ({:?})", element, message, debug);
                        self.stop();
                        return Err(PipelineError::Runtime { element, message, debug });
                    }
                    Some(PipelineEvent::Warning { element, message, debug }) => {
                        log::warn!("[gst] WARN from {}: {} ({:?})", element, message, debug);
                    }
                    Some(PipelineEvent::StateChanged { old, current }) => {
                        log::info!("[gst] pipeline state {} -> {}", old, current);
                    }
                    Some(PipelineEvent::StreamStart { element }) => {
                        log::info!("[gst] STREAM START from {}", element);
                    }
                    Some(PipelineEvent::Eos) => {
                        log::warn!("[gst] EOS");
                        break RunOutcome::EndOfStream;
                    }
                    None => {
                        log::debug!("Bus stream closed");
                        bus_open = false;
                    }
                }
            }
        };

        self.stop();
        Ok(outcome)
    }

    /// Sets the pipeline to Null and releases it
    pub fn stop(self) {
        log::info!("Stopping pipeline {}", self.guard.name());
        drop(self.guard);
    }
}
