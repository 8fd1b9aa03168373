//! The slice of a multimedia framework the streamer depends on.
//!
//! Everything that actually moves video (capture, encoding, packetization,
//! sending) lives behind this trait. `GstFramework` binds it to GStreamer;
//! tests bind it to a recording fake.

mod gst;

pub use self::gst::GstFramework;

use futures_util::stream::BoxStream;
use std::fmt;
use thiserror::Error;

use crate::profile::CaptureFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FrameworkError(String);

impl FrameworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A property value as handed to an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Str(String),
    Int(i32),
    UInt(u32),
    /// Enum or flags value given by its nick, e.g. `zerolatency`
    Nick(&'static str),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Str(s) => write!(f, "\"{}\"", s),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::UInt(v) => write!(f, "{}", v),
            PropertyValue::Nick(n) => f.write_str(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Null,
    Ready,
    Paused,
    Playing,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Null => "NULL",
            PipelineState::Ready => "READY",
            PipelineState::Paused => "PAUSED",
            PipelineState::Playing => "PLAYING",
        };
        f.write_str(name)
    }
}

/// Bus messages the streamer reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Error {
        element: String,
        message: String,
        debug: Option<String>,
    },
    Warning {
        element: String,
        message: String,
        debug: Option<String>,
    },
    /// State change of the pipeline container itself
    StateChanged {
        old: PipelineState,
        current: PipelineState,
    },
    StreamStart {
        element: String,
    },
    Eos,
}

pub trait MediaFramework {
    type Element;
    type Pipeline;

    /// Instantiates an element from the named factory
    fn make_element(&self, factory: &str, name: &str) -> Result<Self::Element, FrameworkError>;

    fn set_property(
        &self,
        element: &Self::Element,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), FrameworkError>;

    /// Creates an empty pipeline container
    fn new_pipeline(&self, name: &str) -> Result<Self::Pipeline, FrameworkError>;

    /// Hands the elements over to the container
    fn add_elements(
        &self,
        pipeline: &Self::Pipeline,
        elements: &[&Self::Element],
    ) -> Result<(), FrameworkError>;

    /// Links `src` to `dest`, optionally restricted to a raw video format
    fn link(
        &self,
        src: &Self::Element,
        dest: &Self::Element,
        filter: Option<&CaptureFormat>,
    ) -> Result<(), FrameworkError>;

    fn set_state(
        &self,
        pipeline: &Self::Pipeline,
        state: PipelineState,
    ) -> Result<(), FrameworkError>;

    /// Stream of bus events for the pipeline
    fn events(
        &self,
        pipeline: &Self::Pipeline,
    ) -> Result<BoxStream<'static, PipelineEvent>, FrameworkError>;
}
