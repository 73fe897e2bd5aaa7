//! The per-run registry of step contexts.

use super::{BaseStepContext, OutputNotifier, StepContext};
use crate::bundle::{ElementMetadata, TupleTag};
use crate::events::{NoOpOutputListener, OutputListener};
use crate::observability::StateSampler;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use tracing::debug;
use uuid::Uuid;

/// Everything a factory needs to build a step context.
#[derive(Debug, Clone)]
pub struct StepContextArgs {
    /// Identity and routing, already attached to the execution context.
    pub base: BaseStepContext,
    /// Sampler to attribute the step's execution time to, if any.
    pub sampler: Option<Arc<StateSampler>>,
}

/// Builds the concrete step context type an execution context hands out.
///
/// Implemented for any `Fn(StepContextArgs) -> C`.
pub trait StepContextFactory<C>: Send + Sync {
    /// Creates the context for one step.
    fn create_step_context(&self, args: StepContextArgs) -> C;
}

impl<C, F> StepContextFactory<C> for F
where
    F: Fn(StepContextArgs) -> C + Send + Sync,
{
    fn create_step_context(&self, args: StepContextArgs) -> C {
        self(args)
    }
}

/// One pipeline run's registry of step contexts.
///
/// Exactly one context exists per step name for the lifetime of the
/// registry, even when several threads ask for the same step concurrently.
/// All output notes, whether reported here or on a step context, reach the
/// same [`OutputListener`].
pub struct ExecutionContext<C> {
    run_id: Uuid,
    step_contexts: DashMap<String, Arc<OnceLock<Arc<C>>>>,
    factory: Box<dyn StepContextFactory<C>>,
    listener: Arc<dyn OutputListener>,
    self_ref: Weak<Self>,
}

impl<C: StepContext + 'static> ExecutionContext<C> {
    /// Creates a registry whose output notes are discarded.
    pub fn new(factory: impl StepContextFactory<C> + 'static) -> Arc<Self> {
        Self::with_listener(factory, Arc::new(NoOpOutputListener))
    }

    /// Creates a registry routing output notes to `listener`.
    pub fn with_listener(
        factory: impl StepContextFactory<C> + 'static,
        listener: Arc<dyn OutputListener>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            run_id: Uuid::new_v4(),
            step_contexts: DashMap::new(),
            factory: Box::new(factory),
            listener,
            self_ref: self_ref.clone(),
        })
    }

    /// Returns the context for `step_name`, creating it on first request.
    ///
    /// Later calls return the same instance regardless of `transform_name`
    /// and `sampler`. The factory runs outside the registry's locks, so it may
    /// look up or create other steps, but not the step being created.
    /// Concurrent callers for the same step wait for the first one's factory
    /// call instead of running their own.
    pub fn get_or_create_step_context(
        &self,
        step_name: &str,
        transform_name: &str,
        sampler: Option<Arc<StateSampler>>,
    ) -> Arc<C> {
        let slot = self.slot(step_name);
        let context = slot.get_or_init(|| {
            debug!(
                run_id = %self.run_id,
                step = step_name,
                transform = transform_name,
                "Creating step context"
            );
            let notifier: Weak<dyn OutputNotifier> = self.self_ref.clone();
            let base = BaseStepContext::new(step_name, transform_name, notifier);
            Arc::new(
                self.factory
                    .create_step_context(StepContextArgs { base, sampler }),
            )
        });
        Arc::clone(context)
    }

    fn slot(&self, step_name: &str) -> Arc<OnceLock<Arc<C>>> {
        if let Some(existing) = self.step_contexts.get(step_name) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .step_contexts
            .entry(step_name.to_string())
            .or_default();
        Arc::clone(entry.value())
    }

    /// Returns the context for `step_name` if it has been created.
    #[must_use]
    pub fn step_context(&self, step_name: &str) -> Option<Arc<C>> {
        self.step_contexts
            .get(step_name)
            .and_then(|entry| entry.value().get().cloned())
    }

    /// Returns a snapshot of every context created so far.
    #[must_use]
    pub fn all_step_contexts(&self) -> Vec<Arc<C>> {
        self.step_contexts
            .iter()
            .filter_map(|entry| entry.value().get().cloned())
            .collect()
    }

    /// Returns the number of step contexts created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.step_contexts
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Returns true if no step context has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the id of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Called whenever a main output is emitted.
    pub fn note_output(&self, output: &ElementMetadata) {
        self.notify_output(None, output);
    }

    /// Called whenever a tagged side output is emitted.
    pub fn note_side_output(&self, tag: &TupleTag, output: &ElementMetadata) {
        self.notify_side_output(None, tag, output);
    }
}

impl ExecutionContext<BaseStepContext> {
    /// Creates a registry of plain [`BaseStepContext`]s.
    #[must_use]
    pub fn basic() -> Arc<Self> {
        Self::new(|args: StepContextArgs| args.base)
    }
}

impl<C: StepContext + 'static> OutputNotifier for ExecutionContext<C> {
    fn notify_output(&self, step_name: Option<&str>, output: &ElementMetadata) {
        self.listener.on_output(step_name, output);
    }

    fn notify_side_output(&self, step_name: Option<&str>, tag: &TupleTag, output: &ElementMetadata) {
        self.listener.on_side_output(step_name, tag, output);
    }
}

impl<C> fmt::Debug for ExecutionContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut steps: Vec<String> = self
            .step_contexts
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .map(|entry| entry.key().clone())
            .collect();
        steps.sort();
        f.debug_struct("ExecutionContext")
            .field("run_id", &self.run_id)
            .field("steps", &steps)
            .finish_non_exhaustive()
    }
}
