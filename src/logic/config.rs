//! Detector Configuration
//!
//! Runtime settings for the detection engine and the demo run, resolved
//! from the environment with the defaults in `constants.rs`.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::model::{BsoWeights, HybridClassifier, ModelResult};
use crate::logic::validation::ValidationReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub window_secs: u64,
    pub window_capacity: usize,
    pub volume_baseline_bps: f64,
    /// None = OS entropy
    pub seed: Option<u64>,
    pub training_windows: usize,
    pub test_windows: usize,
    /// SVM share of the hybrid vote; the forest gets `1 - svm_weight`
    pub svm_weight: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_secs: constants::DEFAULT_WINDOW_SECS,
            window_capacity: constants::DEFAULT_WINDOW_CAPACITY,
            volume_baseline_bps: constants::DEFAULT_VOLUME_BASELINE_BPS,
            seed: None,
            training_windows: constants::DEFAULT_TRAINING_WINDOWS,
            test_windows: constants::DEFAULT_TEST_WINDOWS,
            svm_weight: constants::DEFAULT_SVM_WEIGHT,
        }
    }
}

impl DetectorConfig {
    pub fn from_env() -> Self {
        Self {
            window_secs: constants::get_window_secs(),
            seed: constants::get_seed(),
            training_windows: constants::get_training_windows(),
            test_windows: constants::get_test_windows(),
            svm_weight: constants::get_svm_weight(),
            ..Default::default()
        }
    }

    pub fn bso_weights(&self) -> ModelResult<BsoWeights> {
        BsoWeights::new(self.svm_weight, 1.0 - self.svm_weight)
    }

    /// Hybrid configuration with this seed and these weights
    pub fn hybrid(&self) -> ModelResult<HybridClassifier> {
        Ok(HybridClassifier::default()
            .with_seed(self.seed)
            .with_weights(self.bso_weights()?))
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        if self.window_secs == 0 {
            report.error("window_secs must be positive");
        } else if self.window_secs > constants::MAX_WINDOW_SECS {
            report.error(format!(
                "window_secs must be at most {}, got {}",
                constants::MAX_WINDOW_SECS,
                self.window_secs
            ));
        }
        if self.window_capacity == 0 {
            report.error("window_capacity must be positive");
        }
        if !(self.volume_baseline_bps.is_finite() && self.volume_baseline_bps > 0.0) {
            report.error(format!(
                "volume_baseline_bps must be positive, got {}",
                self.volume_baseline_bps
            ));
        }
        if self.training_windows == 0 {
            report.error("training_windows must be positive");
        } else if self.training_windows < 3 {
            report.warn("fewer than 3 training windows cannot cover every class");
        }
        if self.test_windows == 0 {
            report.error("test_windows must be positive");
        }
        if let Err(e) = self.bso_weights() {
            report.error(e.to_string());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_valid());
        assert_eq!(config.bso_weights().unwrap().as_array(), [0.6, 0.4]);
    }

    #[test]
    fn test_invalid_config_reported() {
        let config = DetectorConfig {
            window_secs: 0,
            svm_weight: 1.5,
            training_windows: 2,
            ..Default::default()
        };
        let report = config.validate();
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(config.hybrid().is_err());
    }

    #[test]
    fn test_window_upper_bound() {
        let config = DetectorConfig {
            window_secs: u64::MAX / 100,
            ..Default::default()
        };
        let report = config.validate();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("at most"));

        let config = DetectorConfig {
            window_secs: constants::MAX_WINDOW_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_hybrid_from_config() {
        let config = DetectorConfig {
            seed: Some(7),
            svm_weight: 0.25,
            ..Default::default()
        };
        let hybrid = config.hybrid().unwrap();
        assert_eq!(hybrid.weights.as_array(), [0.25, 0.75]);
        assert_eq!(hybrid.svm.seed, Some(7));
        assert_eq!(hybrid.forest.seed, Some(8));
    }
}
