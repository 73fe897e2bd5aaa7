//! Tests for the bundle lifecycle.

#[cfg(test)]
mod tests {
    use crate::bundle::{
        BundleFactory, BundleKey, CommittedBundle, PCollection, UncommittedBundle, WindowedValue,
    };
    use crate::errors::BundleflowError;
    use crate::time::{from_millis, MAX_TIMESTAMP};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn numbers() -> PCollection<i64> {
        PCollection::new("numbers")
    }

    #[test]
    fn test_unkeyed_bundle_has_no_key() {
        let bundle = UncommittedBundle::unkeyed(numbers());
        assert!(!bundle.is_keyed());
        assert!(bundle.key().is_none());
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_keyed_bundle_keeps_key_through_commit() {
        let mut bundle = UncommittedBundle::keyed(numbers(), "user-1");
        bundle.add(WindowedValue::in_global_window(1)).unwrap();

        let committed = bundle.commit(from_millis(10)).unwrap();

        assert!(committed.is_keyed());
        assert_eq!(committed.key(), Some(&BundleKey::from("user-1")));
    }

    #[test]
    fn test_commit_preserves_insertion_order() {
        let collection = numbers();
        let mut bundle = UncommittedBundle::unkeyed(collection.clone());
        bundle
            .add(WindowedValue::timestamped(3, from_millis(3)))
            .unwrap()
            .add(WindowedValue::timestamped(1, from_millis(1)))
            .unwrap()
            .add(WindowedValue::timestamped(2, from_millis(2)))
            .unwrap();
        assert_eq!(bundle.len(), 3);

        let committed = bundle.commit(from_millis(100)).unwrap();

        assert_eq!(committed.values().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
        assert_eq!(committed.collection(), &collection);
        assert_eq!(
            committed.synchronized_processing_output_watermark(),
            from_millis(100)
        );
    }

    #[test]
    fn test_add_after_commit_fails() {
        let mut bundle = UncommittedBundle::unkeyed(numbers());
        bundle.commit(MAX_TIMESTAMP).unwrap();

        let err = bundle.add(WindowedValue::in_global_window(1)).unwrap_err();
        assert!(matches!(err, BundleflowError::InvalidState(_)));
        assert!(bundle.is_committed());
    }

    #[test]
    fn test_double_commit_fails() {
        let mut bundle = UncommittedBundle::unkeyed(numbers());
        bundle.add(WindowedValue::in_global_window(1)).unwrap();
        let first = bundle.commit(from_millis(1)).unwrap();

        let err = bundle.commit(from_millis(2)).unwrap_err();
        assert!(matches!(err, BundleflowError::InvalidState(_)));

        // The first snapshot is untouched by the failed second commit.
        assert_eq!(first.len(), 1);
        assert_eq!(first.synchronized_processing_output_watermark(), from_millis(1));
    }

    #[test]
    fn test_empty_bundle_commits() {
        let mut bundle = UncommittedBundle::<i64>::unkeyed(numbers());
        let committed = bundle.commit(from_millis(0)).unwrap();
        assert!(committed.is_empty());
    }

    #[test]
    fn test_committed_bundle_clone_shares_elements() {
        let mut bundle = UncommittedBundle::unkeyed(numbers());
        bundle.add(WindowedValue::in_global_window(1)).unwrap();
        let committed = bundle.commit(from_millis(0)).unwrap();
        let copy = committed.clone();

        assert!(std::ptr::eq(
            committed.elements().as_ptr(),
            copy.elements().as_ptr()
        ));
    }

    #[test]
    fn test_committed_bundle_concurrent_readers() {
        let mut bundle = UncommittedBundle::unkeyed(numbers());
        for i in 0..100 {
            bundle.add(WindowedValue::in_global_window(i)).unwrap();
        }
        let committed = Arc::new(bundle.commit(from_millis(0)).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let committed = Arc::clone(&committed);
                std::thread::spawn(move || committed.values().sum::<i64>())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4950);
        }
    }

    #[test]
    fn test_committed_bundle_display() {
        let collection = PCollection::<i64>::new("numbers");
        let mut bundle = UncommittedBundle::keyed(collection, 7_i64);
        bundle.add(WindowedValue::in_global_window(1)).unwrap();
        let committed = bundle.commit(from_millis(0)).unwrap();

        assert_eq!(
            committed.to_string(),
            "CommittedBundle{collection=numbers, key=7, elements=1, watermark=1970-01-01T00:00:00.000000+00:00}"
        );
    }

    fn committed_keyed(key: &str) -> CommittedBundle<i64> {
        let mut bundle = UncommittedBundle::keyed(numbers(), key);
        bundle.add(WindowedValue::in_global_window(1)).unwrap();
        bundle.commit(from_millis(0)).unwrap()
    }

    #[test]
    fn test_factory_root_bundle_is_unkeyed() {
        let bundle = BundleFactory::new().create_root_bundle(numbers());
        assert!(!bundle.is_keyed());
    }

    #[test]
    fn test_factory_bundle_inherits_input_key() {
        let input = committed_keyed("k1");
        let strings = PCollection::<String>::new("strings");

        let output = BundleFactory::new().create_bundle(&input, strings.clone());

        assert_eq!(output.key(), Some(&BundleKey::from("k1")));
        assert_eq!(output.collection(), &strings);
    }

    #[test]
    fn test_factory_keyed_bundle_overrides_key() {
        let input = committed_keyed("k1");
        let output = BundleFactory::new().create_keyed_bundle(&input, "k2", numbers());
        assert_eq!(output.key(), Some(&BundleKey::from("k2")));
    }
}
