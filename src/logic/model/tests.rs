//! Integration Tests for the Classifiers
//!
//! Handles trained on generated labelled windows.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{FeatureExtractor, ProcessedFeatures};
    use crate::logic::model::{
        Classifier, HybridClassifier, ModelError, ModelHandle, RandomForestClassifier, SvmClassifier, Trainable,
        TrainingData,
    };
    use crate::logic::threat::TrafficClass;
    use crate::logic::traffic::SyntheticTrafficGenerator;

    const NOW: i64 = 1_700_000_000_000;

    fn generated(windows: usize, seed: u64) -> Vec<TrainingData> {
        let extractor = FeatureExtractor::default();
        SyntheticTrafficGenerator::new(Some(seed)).generate_training_set(windows, NOW, &extractor)
    }

    fn assert_normalized<C: Classifier>(model: &C, data: &[TrainingData]) {
        for sample in data {
            let result = model.classify(&sample.features);
            assert!(result.probabilities.is_normalized(), "{:?}", result.probabilities);
            assert_eq!(result.confidence, result.probabilities.get(result.prediction));
        }
    }

    #[test]
    fn test_probabilities_normalized_for_every_classifier() {
        let train = generated(30, 1);
        let test = generated(15, 2);

        let svm = SvmClassifier::default().with_seed(Some(1)).train(&train).unwrap();
        assert_normalized(&svm, &test);

        let forest = RandomForestClassifier::default().with_seed(Some(1)).train(&train).unwrap();
        assert_normalized(&forest, &test);

        let hybrid = HybridClassifier::default().with_seed(Some(1)).train(&train).unwrap();
        assert_normalized(&hybrid, &test);

        // Degenerate input as well
        assert!(hybrid.probabilities(&ProcessedFeatures::default()).is_normalized());
    }

    #[test]
    fn test_untrained_handles_refuse_to_classify() {
        let features = ProcessedFeatures::default();

        let svm = ModelHandle::new(SvmClassifier::default());
        assert_eq!(svm.classify(&features).unwrap_err(), ModelError::NotTrained { model: "SVM" });
        assert!(svm.predict(&[0.0; 10]).is_err());

        let forest = ModelHandle::new(RandomForestClassifier::default());
        assert!(matches!(forest.classify(&features), Err(ModelError::NotTrained { .. })));

        let hybrid: ModelHandle<HybridClassifier> = ModelHandle::default();
        assert!(matches!(hybrid.classify(&features), Err(ModelError::NotTrained { .. })));
        assert!(matches!(hybrid.evaluate_model(&generated(3, 1)), Err(ModelError::NotTrained { .. })));
        assert!(!hybrid.model_info().trained);
    }

    #[test]
    fn test_single_label_forest_is_all_leaves() {
        let train: Vec<_> = generated(30, 4)
            .into_iter()
            .filter(|s| s.label == TrafficClass::Ddos)
            .collect();

        let forest = RandomForestClassifier::default().with_seed(Some(4)).train(&train).unwrap();
        assert!(forest.trees().iter().all(|t| t.root().is_leaf()));
        assert_eq!(forest.probabilities(&ProcessedFeatures::default()).ddos, 1.0);
    }

    #[test]
    fn test_hybrid_empty_training_set() {
        let mut handle: ModelHandle<HybridClassifier> = ModelHandle::default();
        assert_eq!(handle.train(&[]).unwrap_err(), ModelError::EmptyTrainingSet);
        assert!(!handle.is_trained());
    }

    #[test]
    fn test_failed_retrain_leaves_handle_untrained() {
        let mut handle = ModelHandle::new(HybridClassifier::default().with_seed(Some(2)));
        handle.train(&generated(15, 2)).unwrap();
        assert!(handle.is_trained());

        assert!(handle.train(&[]).is_err());
        assert!(!handle.is_trained());
        assert!(handle.classify(&ProcessedFeatures::default()).is_err());
    }

    #[test]
    fn test_retrain_replaces_model() {
        let mut handle = ModelHandle::new(SvmClassifier::default().with_seed(Some(3)));
        handle.train(&generated(12, 3)).unwrap();
        let first = handle.model().unwrap().clone();

        handle.train(&generated(12, 99)).unwrap();
        assert_ne!(handle.model().unwrap(), &first);
    }

    #[test]
    fn test_set_bso_weights() {
        let mut handle = ModelHandle::new(HybridClassifier::default().with_seed(Some(5)));

        // Accepted before training, carried into the fitted model
        handle.set_bso_weights(&[0.3, 0.7]).unwrap();
        handle.train(&generated(15, 5)).unwrap();
        assert_eq!(handle.model().unwrap().weights().as_array(), [0.3, 0.7]);

        handle.set_bso_weights(&[1.0, 0.0]).unwrap();
        assert_eq!(handle.weights().as_array(), [1.0, 0.0]);
        assert_eq!(handle.model().unwrap().weights().as_array(), [1.0, 0.0]);

        // With all weight on the SVM, hybrid output equals the SVM output
        let features = generated(3, 6).remove(2).features;
        let model = handle.model().unwrap();
        let (hybrid, svm) = (model.probabilities(&features), model.svm().probabilities(&features));
        for class in TrafficClass::ALL {
            assert!((hybrid.get(class) - svm.get(class)).abs() < 1e-12);
        }

        let rejected: [&[f64]; 4] = [&[0.7, 0.7], &[-0.5, 1.5], &[1.0], &[f64::INFINITY, 0.0]];
        for bad in rejected {
            assert!(matches!(handle.set_bso_weights(bad), Err(ModelError::InvalidWeights(_))));
            assert_eq!(handle.weights().as_array(), [1.0, 0.0]);
            assert_eq!(handle.model().unwrap().weights().as_array(), [1.0, 0.0]);
        }

        let info = handle.model_info();
        assert!(info.trained);
        assert_eq!(info.parameters["svm_weight"], 1.0);
        assert_eq!(info.components.len(), 2);
    }

    #[test]
    fn test_seeded_hybrid_is_reproducible() {
        let train = generated(24, 8);
        let a = HybridClassifier::default().with_seed(Some(8)).train(&train).unwrap();
        let b = HybridClassifier::default().with_seed(Some(8)).train(&train).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_evaluate_on_generated_windows() {
        let mut handle = ModelHandle::new(HybridClassifier::default().with_seed(Some(42)));
        handle.train(&generated(90, 42)).unwrap();

        let test = generated(30, 43);
        let report = handle.evaluate(&test).unwrap();
        assert_eq!(report.samples, 30);
        assert_eq!(report.confusion.total(), 30);
        assert_eq!(report.per_class.len(), 3);

        let m = report.metrics;
        for v in [m.accuracy, m.precision, m.recall, m.f1_score, m.false_positive_rate, m.false_negative_rate] {
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(handle.evaluate_model(&test).unwrap(), m);
        assert_eq!(handle.evaluate(&[]).unwrap_err(), ModelError::EmptyTestSet);
    }
}
