//! RAII guard for the pipeline container
//!
//! Once the container exists it is owned by this guard. Dropping the guard
//! stops the pipeline and releases the container together with every stage
//! added to it, on every exit path including early `?` returns.

use crate::framework::{MediaFramework, PipelineState};

pub struct PipelineGuard<'f, F: MediaFramework> {
    framework: &'f F,
    pipeline: F::Pipeline,
    name: String,
}

impl<'f, F: MediaFramework> PipelineGuard<'f, F> {
    pub fn new(framework: &'f F, pipeline: F::Pipeline, name: impl Into<String>) -> Self {
        let name = name.into();
        log::debug!("Created RAII guard for pipeline: {}", name);
        Self {
            framework,
            pipeline,
            name,
        }
    }

    pub fn framework(&self) -> &'f F {
        self.framework
    }

    pub fn pipeline(&self) -> &F::Pipeline {
        &self.pipeline
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F: MediaFramework> Drop for PipelineGuard<'_, F> {
    fn drop(&mut self) {
        log::debug!("Dropping PipelineGuard: {}", self.name);

        // The container itself is released when the field drops
        if let Err(e) = self.framework.set_state(&self.pipeline, PipelineState::Null) {
            log::warn!("Failed to stop pipeline {}: {}", self.name, e);
        }
    }
}
