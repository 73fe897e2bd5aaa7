//! Parallel consumption of a bounded source into committed bundles.

use crate::bundle::{BundleFactory, CommittedBundle, PCollection, WindowedValue};
use crate::config::PipelineOptions;
use crate::errors::{BundleflowError, Result};
use crate::observability::StateSampler;
use crate::source::{BoundedSource, ReaderIter};
use crate::time::now_utc;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Reads a bounded source with one blocking worker per split.
///
/// Every value lands in the global window at the minimum timestamp. Each
/// worker rolls over to a fresh root bundle once `max_bundle_size` elements
/// have been added (zero means one bundle per split) and commits with the
/// wall-clock time as the bundle's watermark.
#[derive(Debug, Clone)]
pub struct BoundedReadDriver {
    options: PipelineOptions,
    factory: BundleFactory,
    sampler: Option<Arc<StateSampler>>,
}

impl BoundedReadDriver {
    /// Creates a driver for the given options.
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            factory: BundleFactory::new(),
            sampler: None,
        }
    }

    /// Attributes worker time to the "read" state of `sampler`.
    #[must_use]
    pub fn with_sampler(mut self, sampler: Arc<StateSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Returns the options this driver splits and bundles with.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Splits `source`, reads every split concurrently and returns the
    /// committed bundles in split order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by validation, splitting or any
    /// reader. A worker that panics surfaces as `Internal`.
    pub async fn read<S>(
        &self,
        source: &S,
        output: &PCollection<S::Output>,
    ) -> Result<Vec<CommittedBundle<S::Output>>>
    where
        S: BoundedSource + 'static,
        S::Output: Sync + 'static,
    {
        self.options.validate()?;
        source.validate()?;

        let start = Instant::now();
        let splits = source.split_with_options(&self.options)?;
        let split_count = splits.len();
        debug!(
            job = %self.options.job_name,
            collection = %output,
            splits = split_count,
            "Reading bounded source"
        );

        let workers = splits.into_iter().enumerate().map(|(index, split)| {
            let factory = self.factory;
            let output = output.clone();
            let max_bundle_size = self.options.max_bundle_size;
            let sampler = self.sampler.clone();
            async move {
                tokio::task::spawn_blocking(move || {
                    let _read = sampler.as_deref().map(|s| s.scoped("read"));
                    read_split(&factory, &split, &output, max_bundle_size)
                })
                .await
                .map_err(|err| {
                    BundleflowError::internal(format!("Read worker {index} failed: {err}"))
                })?
            }
        });

        let bundles: Vec<_> = try_join_all(workers).await?.into_iter().flatten().collect();

        info!(
            job = %self.options.job_name,
            collection = %output,
            splits = split_count,
            bundles = bundles.len(),
            elements = bundles.iter().map(CommittedBundle::len).sum::<usize>(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Bounded read finished"
        );
        Ok(bundles)
    }
}

fn read_split<S: BoundedSource>(
    factory: &BundleFactory,
    split: &S,
    output: &PCollection<S::Output>,
    max_bundle_size: usize,
) -> Result<Vec<CommittedBundle<S::Output>>> {
    let mut committed = Vec::new();
    let mut bundle = factory.create_root_bundle(output.clone());

    for value in ReaderIter::new(split.create_reader()?) {
        bundle.add(WindowedValue::in_global_window(value?))?;
        if max_bundle_size > 0 && bundle.len() >= max_bundle_size {
            committed.push(bundle.commit(now_utc())?);
            bundle = factory.create_root_bundle(output.clone());
        }
    }

    if !bundle.is_empty() {
        committed.push(bundle.commit(now_utc())?);
    }
    Ok(committed)
}
