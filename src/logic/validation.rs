//! Validation - Configuration and result sanity checks
//!
//! Each validator returns a `ValidationReport` of hard errors and soft
//! warnings. Reports can be merged under a prefix and turned into a
//! `ModelResult` at the call site.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::logic::model::{ModelError, ModelMetrics, ModelResult, RandomForestClassifier, SvmClassifier, TrainingData};
use crate::logic::model::svm::MAX_EPOCHS;
use crate::logic::threat::TrafficClass;

// ============================================================================
// LIMITS
// ============================================================================

const MAX_TREES_WARN: usize = 10_000;
const MAX_DEPTH_WARN: usize = 100;
const MIN_SPLIT_SAMPLES: usize = 2;
const F1_CONSISTENCY_TOLERANCE: f64 = 0.01;
const METRIC_DRIFT_WARN: f64 = 0.1;

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Fold another report in, tagging its messages with `[prefix]`
    pub fn merge(&mut self, prefix: &str, other: ValidationReport) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("[{}] {}", prefix, e)));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("[{}] {}", prefix, w)));
    }

    /// Log warnings; errors become `ModelError::InvalidConfig`
    pub fn into_result(self, context: &str) -> ModelResult<()> {
        for warning in &self.warnings {
            log::warn!("{}: {}", context, warning);
        }
        if self.errors.is_empty() {
            return Ok(());
        }
        log::warn!("{} rejected: {}", context, self.errors.join("; "));
        Err(ModelError::InvalidConfig(format!("{}: {}", context, self.errors.join("; "))))
    }
}

// ============================================================================
// MODEL CONFIGURATION
// ============================================================================

pub fn validate_forest_config(config: &RandomForestClassifier) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.n_trees < 1 {
        report.error("n_trees must be at least 1");
    } else if config.n_trees > MAX_TREES_WARN {
        report.warn(format!("n_trees > {} may cause memory issues", MAX_TREES_WARN));
    }

    if config.max_depth < 1 {
        report.error("max_depth must be at least 1");
    } else if config.max_depth > MAX_DEPTH_WARN {
        report.warn(format!("max_depth > {} may cause overfitting", MAX_DEPTH_WARN));
    }

    if config.min_samples < MIN_SPLIT_SAMPLES {
        report.error(format!("min_samples must be at least {}", MIN_SPLIT_SAMPLES));
    }

    report
}

pub fn validate_svm_config(config: &SvmClassifier) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.max_epochs < 1 || config.max_epochs > MAX_EPOCHS {
        report.error(format!("max_epochs must be in 1..={}, got {}", MAX_EPOCHS, config.max_epochs));
    }
    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        report.error(format!("learning_rate must be positive, got {}", config.learning_rate));
    }
    if !(config.gamma.is_finite() && config.gamma > 0.0) {
        report.error(format!("gamma must be positive, got {}", config.gamma));
    }
    if !(config.c.is_finite() && config.c > 0.0) {
        report.error(format!("c must be positive, got {}", config.c));
    }
    if !(config.tolerance.is_finite() && config.tolerance >= 0.0) {
        report.error(format!("tolerance must be non-negative, got {}", config.tolerance));
    }

    report
}

// ============================================================================
// DATA
// ============================================================================

pub fn validate_training_set(data: &[TrainingData]) -> ValidationReport {
    let mut report = ValidationReport::new();

    if data.is_empty() {
        report.error("training set is empty");
        return report;
    }

    for (i, sample) in data.iter().enumerate() {
        if !sample.features.is_finite() {
            report.error(format!("sample {} has non-finite features", i));
        }
    }

    let present: HashSet<TrafficClass> = data.iter().map(|s| s.label).collect();
    for class in TrafficClass::ALL {
        if !present.contains(&class) {
            report.warn(format!("no samples labelled {}", class));
        }
    }

    report
}

// ============================================================================
// RESULTS
// ============================================================================

pub fn validate_metrics(metrics: &ModelMetrics) -> ValidationReport {
    let mut report = ValidationReport::new();

    let named = [
        ("accuracy", metrics.accuracy),
        ("precision", metrics.precision),
        ("recall", metrics.recall),
        ("f1_score", metrics.f1_score),
        ("false_positive_rate", metrics.false_positive_rate),
        ("false_negative_rate", metrics.false_negative_rate),
    ];
    for (name, value) in named {
        if !(0.0..=1.0).contains(&value) {
            report.error(format!("{} must be between 0 and 1, got {}", name, value));
        }
    }

    let (p, r) = (metrics.precision, metrics.recall);
    if p > 0.0 && r > 0.0 {
        let expected = 2.0 * p * r / (p + r);
        if (metrics.f1_score - expected).abs() > F1_CONSISTENCY_TOLERANCE {
            report.warn(format!(
                "F1 inconsistency: calculated {:.4}, got {:.4}",
                expected, metrics.f1_score
            ));
        }
    }

    if r > metrics.accuracy + METRIC_DRIFT_WARN {
        report.warn("recall exceeds accuracy by more than 10%");
    }
    if p > metrics.accuracy + METRIC_DRIFT_WARN {
        report.warn("precision exceeds accuracy by more than 10%");
    }

    report
}

pub fn validate_confusion_matrix(rows: &[Vec<u64>], num_classes: usize) -> ValidationReport {
    let mut report = ValidationReport::new();

    if rows.len() != num_classes {
        report.error(format!(
            "confusion matrix has {} rows, expected {}",
            rows.len(),
            num_classes
        ));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != rows.len() {
            report.error(format!("row {} has {} columns, expected {}", i, row.len(), rows.len()));
        }
    }
    if rows.iter().flatten().all(|&c| c == 0) {
        report.error("confusion matrix is empty (all zeros)");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::ProcessedFeatures;
    use crate::logic::model::ConfusionMatrix;

    #[test]
    fn test_forest_config_rules() {
        assert!(validate_forest_config(&RandomForestClassifier::default()).is_valid());

        let report = validate_forest_config(&RandomForestClassifier::new(0, 0, 1));
        assert_eq!(report.errors.len(), 3);

        let report = validate_forest_config(&RandomForestClassifier::new(20_000, 200, 2));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_svm_config_rules() {
        assert!(validate_svm_config(&SvmClassifier::default()).is_valid());

        let mut svm = SvmClassifier::default();
        svm.max_epochs = 101;
        svm.learning_rate = 0.0;
        svm.gamma = f64::NAN;
        let report = validate_svm_config(&svm);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_training_set_rules() {
        assert!(!validate_training_set(&[]).is_valid());

        let mut bad = ProcessedFeatures::default();
        bad.packet_rate = f64::INFINITY;
        let data = vec![
            TrainingData::new(ProcessedFeatures::default(), TrafficClass::Normal),
            TrainingData::new(bad, TrafficClass::Ddos),
        ];
        let report = validate_training_set(&data);
        assert_eq!(report.errors, vec!["sample 1 has non-finite features".to_string()]);
        // Suspicious missing
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_metrics_rules() {
        let good = ModelMetrics {
            accuracy: 0.9,
            precision: 0.9,
            recall: 0.9,
            f1_score: 0.9,
            false_positive_rate: 0.05,
            false_negative_rate: 0.1,
        };
        let report = validate_metrics(&good);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());

        let odd = ModelMetrics {
            accuracy: 0.5,
            f1_score: 0.2,
            false_positive_rate: 1.5,
            ..good
        };
        let report = validate_metrics(&odd);
        assert_eq!(report.errors.len(), 1);
        // F1 mismatch plus both drift warnings
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_confusion_matrix_rules() {
        let mut cm = ConfusionMatrix::new();
        assert!(!validate_confusion_matrix(&cm.rows(), 3).is_valid());

        cm.record(TrafficClass::Normal, TrafficClass::Ddos);
        assert!(validate_confusion_matrix(&cm.rows(), 3).is_valid());
        assert!(!validate_confusion_matrix(&cm.rows(), 5).is_valid());
        assert!(!validate_confusion_matrix(&[vec![1, 0], vec![0]], 2).is_valid());
    }

    #[test]
    fn test_merge_and_into_result() {
        let mut all = ValidationReport::new();
        all.merge("RF", validate_forest_config(&RandomForestClassifier::new(0, 5, 2)));
        all.merge("SVM", validate_svm_config(&SvmClassifier::default()));

        assert_eq!(all.errors, vec!["[RF] n_trees must be at least 1".to_string()]);
        assert!(matches!(all.into_result("hybrid"), Err(ModelError::InvalidConfig(_))));
        assert!(ValidationReport::new().into_result("noop").is_ok());
    }
}
