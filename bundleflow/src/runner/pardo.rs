//! Element-wise transforms over committed bundles.

use crate::bundle::{BundleFactory, CommittedBundle, PCollection};
use crate::context::{ExecutionContext, StepContext};
use crate::errors::Result;
use crate::observability::StateSampler;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Applies a function to every element of a bundle on behalf of one step.
///
/// Outputs keep the timestamp and windows of the element they came from,
/// are noted on the step context, and are committed with the input bundle's
/// watermark into a bundle that inherits the input's key.
pub struct ParDoStep<C, F> {
    context: Arc<C>,
    func: F,
    factory: BundleFactory,
    sampler: Option<Arc<StateSampler>>,
}

impl<C: StepContext + 'static, F> ParDoStep<C, F> {
    /// Creates a step running `func` within `context`.
    pub fn new(context: Arc<C>, func: F) -> Self {
        Self {
            context,
            func,
            factory: BundleFactory::new(),
            sampler: None,
        }
    }

    /// Creates a step whose context is fetched from (or created in)
    /// `execution`.
    pub fn in_context(
        execution: &ExecutionContext<C>,
        step_name: &str,
        transform_name: &str,
        sampler: Option<Arc<StateSampler>>,
        func: F,
    ) -> Self {
        let context =
            execution.get_or_create_step_context(step_name, transform_name, sampler.clone());
        Self {
            sampler,
            ..Self::new(context, func)
        }
    }

    /// Returns the step context outputs are noted on.
    pub fn context(&self) -> &Arc<C> {
        &self.context
    }

    /// Processes one input bundle into a committed output bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the output bundle cannot be written or committed.
    pub fn process<I, O>(
        &self,
        input: &CommittedBundle<I>,
        output: PCollection<O>,
    ) -> Result<CommittedBundle<O>>
    where
        F: Fn(&I) -> O,
    {
        let _process = self.sampler.as_deref().map(|s| s.scoped("process"));
        let mut bundle = self.factory.create_bundle(input, output);

        for element in input {
            let produced = element.with_value((self.func)(&element.value));
            self.context.note_output(&produced.metadata());
            bundle.add(produced)?;
        }

        debug!(
            step = self.context.step_name(),
            input = %input,
            outputs = bundle.len(),
            "Processed bundle"
        );
        bundle.commit(input.synchronized_processing_output_watermark())
    }
}

impl<C: StepContext, F> fmt::Debug for ParDoStep<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParDoStep")
            .field("step_name", &self.context.step_name())
            .field("transform_name", &self.context.transform_name())
            .finish_non_exhaustive()
    }
}
