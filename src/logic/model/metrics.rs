//! Evaluation Metrics
//!
//! Confusion matrix over the three traffic classes, pooled (micro) metrics,
//! and per-class reports with macro F1.

use serde::{Deserialize, Serialize};

use crate::logic::threat::TrafficClass;
use crate::logic::validation::validate_confusion_matrix;
use super::error::{ModelError, ModelResult};
use super::types::{Classifier, TrainingData};

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Pooled classification metrics (`evaluateModel`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
}

/// Per-class one-vs-rest scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub class: TrafficClass,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Actual samples of this class
    pub support: u64,
}

/// Rows = actual, columns = predicted, indexed like `TrafficClass::ALL`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[u64; 3]; 3],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actual: TrafficClass, predicted: TrafficClass) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    pub fn get(&self, actual: TrafficClass, predicted: TrafficClass) -> u64 {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Diagonal sum
    pub fn correct(&self) -> u64 {
        (0..3).map(|i| self.counts[i][i]).sum()
    }

    pub fn actual_total(&self, class: TrafficClass) -> u64 {
        self.counts[class.index()].iter().sum()
    }

    pub fn predicted_total(&self, class: TrafficClass) -> u64 {
        self.counts.iter().map(|row| row[class.index()]).sum()
    }

    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.counts.iter().map(|row| row.to_vec()).collect()
    }

    /// Pooled metrics
    ///
    /// TP = correct predictions, FP = FN = misclassifications. The false
    /// positive rate is FP / (FP + TP). Zero denominators give 0.
    pub fn micro_metrics(&self) -> ModelMetrics {
        let total = self.total();
        let tp = self.correct();
        let fp = total - tp;
        let fn_ = fp;

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);

        ModelMetrics {
            accuracy: ratio(tp, total),
            precision,
            recall,
            f1_score: f1(precision, recall),
            false_positive_rate: ratio(fp, fp + tp),
            false_negative_rate: ratio(fn_, fn_ + tp),
        }
    }

    pub fn class_report(&self, class: TrafficClass) -> ClassReport {
        let tp = self.get(class, class);
        let precision = ratio(tp, self.predicted_total(class));
        let recall = ratio(tp, self.actual_total(class));
        ClassReport {
            class,
            precision,
            recall,
            f1_score: f1(precision, recall),
            support: self.actual_total(class),
        }
    }

    pub fn per_class(&self) -> Vec<ClassReport> {
        TrafficClass::ALL.iter().map(|&c| self.class_report(c)).collect()
    }

    /// Unweighted mean of per-class F1 over classes present in the data
    pub fn macro_f1(&self) -> f64 {
        let present: Vec<ClassReport> = self.per_class().into_iter().filter(|r| r.support > 0).collect();
        if present.is_empty() {
            return 0.0;
        }
        present.iter().map(|r| r.f1_score).sum::<f64>() / present.len() as f64
    }
}

/// Full evaluation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub metrics: ModelMetrics,
    pub confusion: ConfusionMatrix,
    pub per_class: Vec<ClassReport>,
    pub macro_f1: f64,
    pub samples: usize,
}

/// Classify every test sample and score the predictions
pub fn evaluate<C: Classifier + ?Sized>(model: &C, test: &[TrainingData]) -> ModelResult<EvaluationReport> {
    if test.is_empty() {
        return Err(ModelError::EmptyTestSet);
    }

    let mut confusion = ConfusionMatrix::new();
    for sample in test {
        confusion.record(sample.label, model.predict_class(&sample.features));
    }

    let checks = validate_confusion_matrix(&confusion.rows(), TrafficClass::ALL.len());
    for issue in checks.errors.iter().chain(&checks.warnings) {
        log::warn!("Confusion matrix: {}", issue);
    }

    let metrics = confusion.micro_metrics();
    log::info!(
        "Evaluation on {} samples: accuracy {:.3}, F1 {:.3}",
        test.len(),
        metrics.accuracy,
        metrics.f1_score
    );

    Ok(EvaluationReport {
        metrics,
        per_class: confusion.per_class(),
        macro_f1: confusion.macro_f1(),
        confusion,
        samples: test.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::ProcessedFeatures;
    use crate::logic::model::types::ModelInfo;
    use crate::logic::threat::ClassProbabilities;

    /// Predicts from `packet_count`: 0 Normal, 1 Suspicious, else Ddos
    struct Oracle;

    impl Classifier for Oracle {
        fn probabilities(&self, features: &ProcessedFeatures) -> ClassProbabilities {
            match features.packet_count {
                0 => ClassProbabilities::from_scores(1.0, 0.0, 0.0),
                1 => ClassProbabilities::from_scores(0.0, 1.0, 0.0),
                _ => ClassProbabilities::from_scores(0.0, 0.0, 1.0),
            }
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo::new("Oracle", serde_json::Value::Null, true)
        }
    }

    fn sample(packet_count: usize, label: TrafficClass) -> TrainingData {
        TrainingData::new(
            ProcessedFeatures {
                packet_count,
                ..Default::default()
            },
            label,
        )
    }

    #[test]
    fn test_perfect_predictions() {
        let test = vec![
            sample(0, TrafficClass::Normal),
            sample(1, TrafficClass::Suspicious),
            sample(2, TrafficClass::Ddos),
            sample(0, TrafficClass::Normal),
        ];
        let report = evaluate(&Oracle, &test).unwrap();

        assert_eq!(report.samples, 4);
        assert_eq!(report.metrics.accuracy, 1.0);
        assert_eq!(report.metrics.precision, 1.0);
        assert_eq!(report.metrics.recall, 1.0);
        assert_eq!(report.metrics.f1_score, 1.0);
        assert_eq!(report.metrics.false_positive_rate, 0.0);
        assert_eq!(report.metrics.false_negative_rate, 0.0);
        assert_eq!(report.macro_f1, 1.0);
    }

    #[test]
    fn test_pooled_counts() {
        // 2 right, 2 wrong
        let test = vec![
            sample(0, TrafficClass::Normal),
            sample(2, TrafficClass::Ddos),
            sample(2, TrafficClass::Normal),
            sample(1, TrafficClass::Ddos),
        ];
        let report = evaluate(&Oracle, &test).unwrap();
        let m = report.metrics;

        assert_eq!(m.accuracy, 0.5);
        assert_eq!(m.precision, 0.5);
        assert_eq!(m.recall, 0.5);
        assert_eq!(m.f1_score, 0.5);
        // FP / (FP + TP)
        assert_eq!(m.false_positive_rate, 0.5);
        assert_eq!(m.false_negative_rate, 0.5);

        assert_eq!(report.confusion.get(TrafficClass::Normal, TrafficClass::Ddos), 1);
        assert_eq!(report.confusion.get(TrafficClass::Ddos, TrafficClass::Suspicious), 1);
        assert_eq!(report.confusion.total(), 4);
    }

    #[test]
    fn test_false_positive_rate_uses_true_positives() {
        let mut cm = ConfusionMatrix::new();
        for _ in 0..3 {
            cm.record(TrafficClass::Normal, TrafficClass::Normal);
        }
        cm.record(TrafficClass::Suspicious, TrafficClass::Ddos);

        let m = cm.micro_metrics();
        assert!((m.false_positive_rate - 0.25).abs() < 1e-12);
        assert_eq!(m.false_positive_rate, m.false_negative_rate);
    }

    #[test]
    fn test_evaluate_matrix_is_well_formed() {
        let test = vec![sample(0, TrafficClass::Normal), sample(2, TrafficClass::Suspicious)];
        let report = evaluate(&Oracle, &test).unwrap();
        assert!(validate_confusion_matrix(&report.confusion.rows(), 3).is_valid());
        assert_eq!(report.metrics.false_positive_rate, 0.5);
    }

    #[test]
    fn test_per_class_and_macro() {
        let mut cm = ConfusionMatrix::new();
        cm.record(TrafficClass::Normal, TrafficClass::Normal);
        cm.record(TrafficClass::Normal, TrafficClass::Normal);
        cm.record(TrafficClass::Ddos, TrafficClass::Normal);
        cm.record(TrafficClass::Ddos, TrafficClass::Ddos);

        let normal = cm.class_report(TrafficClass::Normal);
        assert!((normal.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(normal.recall, 1.0);
        assert_eq!(normal.support, 2);

        let ddos = cm.class_report(TrafficClass::Ddos);
        assert_eq!(ddos.precision, 1.0);
        assert_eq!(ddos.recall, 0.5);

        // Suspicious has no support and is left out of the mean
        let expected = (normal.f1_score + ddos.f1_score) / 2.0;
        assert!((cm.macro_f1() - expected).abs() < 1e-12);
        assert_eq!(cm.class_report(TrafficClass::Suspicious).f1_score, 0.0);
    }

    #[test]
    fn test_empty_matrix_is_zero() {
        let m = ConfusionMatrix::new().micro_metrics();
        assert_eq!(m, ModelMetrics::default());
        assert_eq!(ConfusionMatrix::new().macro_f1(), 0.0);
    }

    #[test]
    fn test_empty_test_set() {
        assert_eq!(evaluate(&Oracle, &[]).unwrap_err(), ModelError::EmptyTestSet);
    }
}
