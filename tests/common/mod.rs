//! Recording fake of the media framework.
//!
//! Every call is logged, any element creation, container creation, link or
//! state change can be told to fail, and handles are counted so tests can
//! check that nothing outlives a failed or finished run.

#![allow(dead_code)]

use futures_util::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use h264_udp_streamer::framework::{
    FrameworkError, MediaFramework, PipelineEvent, PipelineState, PropertyValue,
};
use h264_udp_streamer::profile::CaptureFormat;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Make { factory: String, name: String },
    SetProperty { element: String, property: String, value: PropertyValue },
    NewPipeline { name: String },
    Add { elements: Vec<String> },
    Link { src: String, dest: String, filter: Option<CaptureFormat> },
    SetState(PipelineState),
    Events,
}

#[derive(Default)]
struct Shared {
    calls: Mutex<Vec<Call>>,
    live: AtomicUsize,
}

impl Shared {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Counts itself as a live framework object until dropped
pub struct Handle {
    name: String,
    shared: Arc<Shared>,
}

impl Handle {
    fn new(name: &str, shared: &Arc<Shared>) -> Self {
        shared.live.fetch_add(1, Ordering::SeqCst);
        Self {
            name: name.to_string(),
            shared: Arc::clone(shared),
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Reference-counted like a GObject: clones share one handle
#[derive(Clone)]
pub struct MockElement(Arc<Handle>);

impl MockElement {
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

pub struct MockPipeline {
    handle: Handle,
    children: Mutex<Vec<MockElement>>,
}

#[derive(Default, Clone)]
pub struct Failures {
    /// Factory whose creation fails
    pub factory: Option<&'static str>,
    pub container: bool,
    /// Element name whose outgoing link fails
    pub link_from: Option<&'static str>,
    /// (element name, property name) the element rejects
    pub property: Option<(&'static str, &'static str)>,
    pub add: bool,
    pub bus: bool,
    pub state: Option<PipelineState>,
}

pub struct MockFramework {
    shared: Arc<Shared>,
    failures: Failures,
    events: Mutex<Vec<PipelineEvent>>,
}

impl MockFramework {
    pub fn new() -> Self {
        Self::with_failures(Failures::default())
    }

    pub fn with_failures(failures: Failures) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            failures,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Events delivered on the bus, after which it stays silent
    pub fn with_events(self, events: Vec<PipelineEvent>) -> Self {
        *self.events.lock().unwrap() = events;
        self
    }

    pub fn recorder(&self) -> Recorder {
        Recorder {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Outlives the framework so tests can inspect a finished run
pub struct Recorder {
    shared: Arc<Shared>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }

    pub fn live(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    pub fn links(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Link { src, dest, .. } => Some((src, dest)),
                _ => None,
            })
            .collect()
    }

    pub fn makes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Make { factory, .. } => Some(factory),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<PipelineState> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetState(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn properties_of(&self, element: &str) -> Vec<(String, PropertyValue)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetProperty {
                    element: e,
                    property,
                    value,
                } if e == element => Some((property, value)),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, wanted: &Call) -> Option<usize> {
        self.calls().iter().position(|c| c == wanted)
    }
}

impl MediaFramework for MockFramework {
    type Element = MockElement;
    type Pipeline = MockPipeline;

    fn make_element(&self, factory: &str, name: &str) -> Result<MockElement, FrameworkError> {
        self.shared.record(Call::Make {
            factory: factory.to_string(),
            name: name.to_string(),
        });
        if self.failures.factory == Some(factory) {
            return Err(FrameworkError::new(format!("no such element factory \"{}\"", factory)));
        }
        Ok(MockElement(Arc::new(Handle::new(name, &self.shared))))
    }

    fn set_property(
        &self,
        element: &MockElement,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), FrameworkError> {
        self.shared.record(Call::SetProperty {
            element: element.name().to_string(),
            property: name.to_string(),
            value: value.clone(),
        });
        if self.failures.property == Some((element.name(), name)) {
            return Err(FrameworkError::new(format!(
                "{} has no property \"{}\"",
                element.name(),
                name
            )));
        }
        Ok(())
    }

    fn new_pipeline(&self, name: &str) -> Result<MockPipeline, FrameworkError> {
        self.shared.record(Call::NewPipeline {
            name: name.to_string(),
        });
        if self.failures.container {
            return Err(FrameworkError::new("out of memory"));
        }
        Ok(MockPipeline {
            handle: Handle::new(name, &self.shared),
            children: Mutex::new(Vec::new()),
        })
    }

    fn add_elements(
        &self,
        pipeline: &MockPipeline,
        elements: &[&MockElement],
    ) -> Result<(), FrameworkError> {
        self.shared.record(Call::Add {
            elements: elements.iter().map(|e| e.name().to_string()).collect(),
        });
        if self.failures.add {
            return Err(FrameworkError::new("element already has a parent"));
        }
        pipeline
            .children
            .lock()
            .unwrap()
            .extend(elements.iter().map(|e| (*e).clone()));
        Ok(())
    }

    fn link(
        &self,
        src: &MockElement,
        dest: &MockElement,
        filter: Option<&CaptureFormat>,
    ) -> Result<(), FrameworkError> {
        self.shared.record(Call::Link {
            src: src.name().to_string(),
            dest: dest.name().to_string(),
            filter: filter.copied(),
        });
        if self.failures.link_from == Some(src.name()) {
            return Err(FrameworkError::new("pads have no common format"));
        }
        Ok(())
    }

    fn set_state(
        &self,
        pipeline: &MockPipeline,
        state: PipelineState,
    ) -> Result<(), FrameworkError> {
        self.shared.record(Call::SetState(state));
        if self.failures.state == Some(state) {
            return Err(FrameworkError::new(format!(
                "{} failed to change state",
                pipeline.handle.name
            )));
        }
        Ok(())
    }

    fn events(
        &self,
        _pipeline: &MockPipeline,
    ) -> Result<BoxStream<'static, PipelineEvent>, FrameworkError> {
        self.shared.record(Call::Events);
        if self.failures.bus {
            return Err(FrameworkError::new("pipeline has no bus"));
        }
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        Ok(stream::iter(events).chain(stream::pending()).boxed())
    }
}
