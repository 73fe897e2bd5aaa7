//! Tests for the read driver and element-wise steps.

#[cfg(test)]
mod tests {
    use crate::bundle::{BundleKey, PCollection, UncommittedBundle, WindowedValue};
    use crate::config::PipelineOptions;
    use crate::context::{BaseStepContext, ExecutionContext, StepContextArgs};
    use crate::errors::{BundleflowError, Result};
    use crate::events::CountingOutputListener;
    use crate::observability::StateSampler;
    use crate::runner::{BoundedReadDriver, ParDoStep};
    use crate::source::{BoundedReader, BoundedSource, RangeSource};
    use crate::time::{from_millis, now_utc, MIN_TIMESTAMP};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct FailingSource {
        panic: bool,
    }

    #[derive(Debug)]
    struct FailingReader {
        source: FailingSource,
    }

    impl BoundedSource for FailingSource {
        type Output = i64;
        type Reader = FailingReader;

        fn split(&self, _desired_parallelism: usize) -> Result<Vec<Self>> {
            Ok(vec![self.clone(), self.clone()])
        }

        fn estimated_size_bytes(&self) -> u64 {
            0
        }

        fn create_reader(&self) -> Result<FailingReader> {
            Ok(FailingReader {
                source: self.clone(),
            })
        }
    }

    impl BoundedReader for FailingReader {
        type Output = i64;
        type Source = FailingSource;

        fn start(&mut self) -> Result<bool> {
            if self.source.panic {
                panic!("reader crashed");
            }
            Err(BundleflowError::internal("disk gone"))
        }

        fn advance(&mut self) -> Result<bool> {
            Ok(false)
        }

        fn current(&self) -> Result<i64> {
            Err(BundleflowError::invalid_state("no current element"))
        }

        fn current_source(&self) -> &FailingSource {
            &self.source
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn options(parallelism: usize) -> PipelineOptions {
        PipelineOptions::new()
            .with_parallelism(parallelism)
            .with_job_name("runner-test")
    }

    #[tokio::test]
    async fn test_read_produces_one_bundle_per_split() {
        let source = RangeSource::new(1, 10).unwrap();
        let numbers = PCollection::new("numbers");
        let before = now_utc();

        let bundles = BoundedReadDriver::new(options(3))
            .read(&source, &numbers)
            .await
            .unwrap();

        let sizes: Vec<usize> = bundles.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3]);

        let values: Vec<i64> = bundles.iter().flat_map(|b| b.values().copied()).collect();
        assert_eq!(values, (1..10).collect::<Vec<_>>());

        for bundle in &bundles {
            assert!(!bundle.is_keyed());
            assert_eq!(bundle.collection(), &numbers);
            assert!(bundle.synchronized_processing_output_watermark() >= before);
            assert!(bundle.iter().all(|e| e.timestamp == MIN_TIMESTAMP));
        }
    }

    #[tokio::test]
    async fn test_read_rolls_bundles_at_max_size() {
        let source = RangeSource::new(0, 5).unwrap();
        let driver = BoundedReadDriver::new(options(1).with_max_bundle_size(2));

        let bundles = driver
            .read(&source, &PCollection::new("numbers"))
            .await
            .unwrap();

        let contents: Vec<Vec<i64>> = bundles
            .iter()
            .map(|b| b.values().copied().collect())
            .collect();
        assert_eq!(contents, vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[tokio::test]
    async fn test_read_empty_source_yields_no_bundles() {
        let source = RangeSource::new(5, 5).unwrap();

        let bundles = BoundedReadDriver::new(options(4))
            .read(&source, &PCollection::new("empty"))
            .await
            .unwrap();

        assert!(bundles.is_empty());
    }

    #[tokio::test]
    async fn test_read_rejects_zero_parallelism() {
        let source = RangeSource::new(0, 5).unwrap();

        let err = BoundedReadDriver::new(options(0))
            .read(&source, &PCollection::new("numbers"))
            .await
            .unwrap_err();

        assert!(matches!(err, BundleflowError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_reader_error_fails_read() {
        let err = BoundedReadDriver::new(options(2))
            .read(&FailingSource { panic: false }, &PCollection::new("numbers"))
            .await
            .unwrap_err();

        assert!(matches!(err, BundleflowError::Internal(ref msg) if msg == "disk gone"));
    }

    #[tokio::test]
    async fn test_worker_panic_surfaces_as_internal() {
        let err = BoundedReadDriver::new(options(2))
            .read(&FailingSource { panic: true }, &PCollection::new("numbers"))
            .await
            .unwrap_err();

        assert!(matches!(err, BundleflowError::Internal(ref msg) if msg.starts_with("Read worker")));
    }

    #[tokio::test]
    async fn test_read_records_sampler_time() {
        let sampler = StateSampler::new("reader");
        let driver = BoundedReadDriver::new(options(2)).with_sampler(Arc::clone(&sampler));

        driver
            .read(&RangeSource::new(0, 100).unwrap(), &PCollection::new("numbers"))
            .await
            .unwrap();

        assert!(sampler.snapshot().contains_key("read"));
        assert_eq!(driver.options().parallelism, 2);
    }

    #[test]
    fn test_pardo_preserves_key_watermark_and_timestamps() {
        let counter = Arc::new(CountingOutputListener::new());
        let execution = ExecutionContext::with_listener(
            |args: StepContextArgs| args.base,
            counter.clone(),
        );

        let mut input = UncommittedBundle::keyed(PCollection::<i64>::new("numbers"), "k");
        input.add(WindowedValue::timestamped(1, from_millis(10))).unwrap();
        input.add(WindowedValue::timestamped(2, from_millis(20))).unwrap();
        let input = input.commit(from_millis(99)).unwrap();

        let step = ParDoStep::in_context(&execution, "s1", "ParDo(Format)", None, |n: &i64| {
            n.to_string()
        });
        let output = step.process(&input, PCollection::new("strings")).unwrap();

        assert_eq!(
            output.values().cloned().collect::<Vec<_>>(),
            vec!["1".to_string(), "2".to_string()]
        );
        assert_eq!(output.key(), Some(&BundleKey::from("k")));
        assert_eq!(output.synchronized_processing_output_watermark(), from_millis(99));
        assert_eq!(output.elements()[1].timestamp, from_millis(20));

        let stats = counter.stats("s1").unwrap();
        assert_eq!(stats.outputs, 2);
        assert_eq!(stats.max_timestamp, Some(from_millis(20)));
    }

    #[test]
    fn test_pardo_reuses_step_context_and_samples() {
        let execution = ExecutionContext::basic();
        let sampler = StateSampler::new("worker");
        let step = ParDoStep::in_context(
            &execution,
            "double",
            "ParDo(Double)",
            Some(Arc::clone(&sampler)),
            |n: &i64| n * 2,
        );
        let direct: ParDoStep<BaseStepContext, _> =
            ParDoStep::new(execution.get_or_create_step_context("double", "Other", None), |n: &i64| n + 1);
        assert!(Arc::ptr_eq(step.context(), direct.context()));

        let mut input = UncommittedBundle::unkeyed(PCollection::<i64>::new("numbers"));
        input.add(WindowedValue::in_global_window(21)).unwrap();
        let input = input.commit(MIN_TIMESTAMP).unwrap();

        let doubled = step.process(&input, PCollection::new("doubled")).unwrap();
        assert_eq!(doubled.values().copied().collect::<Vec<_>>(), vec![42]);
        assert!(!doubled.is_keyed());
        assert!(sampler.snapshot().contains_key("process"));
        assert!(format!("{step:?}").contains("ParDo(Double)"));
    }
}
