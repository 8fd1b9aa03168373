use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer::MessageView;

use super::{FrameworkError, MediaFramework, PipelineEvent, PipelineState, PropertyValue};
use crate::profile::CaptureFormat;

impl From<gst::glib::Error> for FrameworkError {
    fn from(err: gst::glib::Error) -> Self {
        FrameworkError::new(err.to_string())
    }
}

impl From<gst::glib::BoolError> for FrameworkError {
    fn from(err: gst::glib::BoolError) -> Self {
        FrameworkError::new(err.to_string())
    }
}

/// `MediaFramework` backed by GStreamer
#[derive(Debug)]
pub struct GstFramework {
    _initialized: (),
}

impl GstFramework {
    /// Initializes GStreamer. Nothing else in the crate calls `gst::init`.
    pub fn init() -> Result<Self, FrameworkError> {
        gst::init()?;
        log::debug!("GStreamer {} initialized", gst::version_string());
        Ok(Self { _initialized: () })
    }
}

impl MediaFramework for GstFramework {
    type Element = gst::Element;
    type Pipeline = gst::Pipeline;

    fn make_element(&self, factory: &str, name: &str) -> Result<gst::Element, FrameworkError> {
        gst::ElementFactory::make(factory)
            .name(name)
            .build()
            .map_err(|e| FrameworkError::new(format!("{} ({}): {}", name, factory, e)))
    }

    fn set_property(
        &self,
        element: &gst::Element,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), FrameworkError> {
        let pspec = element.find_property(name).ok_or_else(|| {
            FrameworkError::new(format!("{} has no property '{}'", element.name(), name))
        })?;

        let gvalue = match value {
            PropertyValue::Str(s) => s.to_value(),
            PropertyValue::Int(v) => v.to_value(),
            PropertyValue::UInt(v) => v.to_value(),
            PropertyValue::Nick(nick) => gst::glib::Value::deserialize(nick, pspec.value_type())
                .map_err(|e| {
                    FrameworkError::new(format!(
                        "{}: '{}' is not a valid value for '{}': {}",
                        element.name(),
                        nick,
                        name,
                        e
                    ))
                })?,
        };

        // set_property_from_value panics on a type mismatch
        if !gvalue.type_().is_a(pspec.value_type()) {
            return Err(FrameworkError::new(format!(
                "{}: property '{}' expects {}, got {}",
                element.name(),
                name,
                pspec.value_type(),
                gvalue.type_()
            )));
        }

        element.set_property_from_value(name, &gvalue);
        log::debug!("{}.{} = {}", element.name(), name, value);
        Ok(())
    }

    fn new_pipeline(&self, name: &str) -> Result<gst::Pipeline, FrameworkError> {
        Ok(gst::Pipeline::builder().name(name).build())
    }

    fn add_elements(
        &self,
        pipeline: &gst::Pipeline,
        elements: &[&gst::Element],
    ) -> Result<(), FrameworkError> {
        pipeline.add_many(elements)?;
        Ok(())
    }

    fn link(
        &self,
        src: &gst::Element,
        dest: &gst::Element,
        filter: Option<&CaptureFormat>,
    ) -> Result<(), FrameworkError> {
        match filter {
            Some(format) => {
                let caps = gst::Caps::builder("video/x-raw")
                    .field("width", format.width)
                    .field("height", format.height)
                    .field(
                        "framerate",
                        gst::Fraction::new(format.framerate_num, format.framerate_den),
                    )
                    .build();
                log::debug!("Linking {} -> {} with {}", src.name(), dest.name(), caps);
                src.link_filtered(dest, &caps)?;
            }
            None => src.link(dest)?,
        }
        Ok(())
    }

    fn set_state(
        &self,
        pipeline: &gst::Pipeline,
        state: PipelineState,
    ) -> Result<(), FrameworkError> {
        let target = match state {
            PipelineState::Null => gst::State::Null,
            PipelineState::Ready => gst::State::Ready,
            PipelineState::Paused => gst::State::Paused,
            PipelineState::Playing => gst::State::Playing,
        };

        pipeline
            .set_state(target)
            .map(|success| log::debug!("{} -> {}: {:?}", pipeline.name(), state, success))
            .map_err(|e| FrameworkError::new(format!("{} -> {}: {}", pipeline.name(), state, e)))
    }

    fn events(
        &self,
        pipeline: &gst::Pipeline,
    ) -> Result<BoxStream<'static, PipelineEvent>, FrameworkError> {
        let bus = pipeline
            .bus()
            .ok_or_else(|| FrameworkError::new(format!("{} has no bus", pipeline.name())))?;

        Ok(bus
            .stream()
            .filter_map(|msg| futures_util::future::ready(to_event(&msg)))
            .boxed())
    }
}

fn from_gst_state(state: gst::State) -> Option<PipelineState> {
    match state {
        gst::State::Null => Some(PipelineState::Null),
        gst::State::Ready => Some(PipelineState::Ready),
        gst::State::Paused => Some(PipelineState::Paused),
        gst::State::Playing => Some(PipelineState::Playing),
        _ => None,
    }
}

fn source_path(msg: &gst::Message) -> String {
    msg.src()
        .map(|s| s.path_string().to_string())
        .unwrap_or_else(|| "unknown".into())
}

fn to_event(msg: &gst::Message) -> Option<PipelineEvent> {
    match msg.view() {
        MessageView::Error(err) => Some(PipelineEvent::Error {
            element: source_path(msg),
            message: err.error().to_string(),
            debug: err.debug().map(|d| d.to_string()),
        }),
        MessageView::Warning(w) => Some(PipelineEvent::Warning {
            element: source_path(msg),
            message: w.error().to_string(),
            debug: w.debug().map(|d| d.to_string()),
        }),
        MessageView::StateChanged(sc)
            if sc
                .src()
                .and_then(|s| s.downcast_ref::<gst::Pipeline>())
                .is_some() =>
        {
            Some(PipelineEvent::StateChanged {
                old: from_gst_state(sc.old())?,
                current: from_gst_state(sc.current())?,
            })
        }
        MessageView::StreamStart(_) => Some(PipelineEvent::StreamStart {
            element: source_path(msg),
        }),
        MessageView::Eos(_) => Some(PipelineEvent::Eos),
        _ => None,
    }
}
