//! Hybrid SVM + Random Forest Classifier
//!
//! Convex combination of the two sub-model probability triples. The
//! combination weights come from an external Bat Swarm Optimization run.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::features::ProcessedFeatures;
use crate::logic::threat::{rules, ClassProbabilities};
use super::error::{ModelError, ModelResult};
use super::forest::{RandomForestClassifier, TrainedForest};
use super::svm::{SvmClassifier, SvmKernel, TrainedSvm};
use super::types::{Classifier, ModelInfo, Trainable, TrainingData};

// ============================================================================
// BSO WEIGHTS
// ============================================================================

/// Combination weights `[svm, forest]`
///
/// Both finite and non-negative, summing to 1 within `WEIGHT_SUM_TOLERANCE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BsoWeights {
    svm: f64,
    forest: f64,
}

impl BsoWeights {
    pub fn new(svm: f64, forest: f64) -> ModelResult<Self> {
        if !svm.is_finite() || !forest.is_finite() {
            return Err(ModelError::InvalidWeights(format!(
                "weights must be finite, got [{}, {}]",
                svm, forest
            )));
        }
        if svm < 0.0 || forest < 0.0 {
            return Err(ModelError::InvalidWeights(format!(
                "weights must be non-negative, got [{}, {}]",
                svm, forest
            )));
        }
        let sum = svm + forest;
        if (sum - 1.0).abs() > rules::WEIGHT_SUM_TOLERANCE {
            return Err(ModelError::InvalidWeights(format!(
                "weights must sum to 1, got {:.4}",
                sum
            )));
        }
        Ok(Self { svm, forest })
    }

    /// Accept exactly two weights
    pub fn try_from_slice(weights: &[f64]) -> ModelResult<Self> {
        match weights {
            [svm, forest] => Self::new(*svm, *forest),
            _ => Err(ModelError::InvalidWeights(format!(
                "expected 2 weights, got {}",
                weights.len()
            ))),
        }
    }

    pub fn svm(&self) -> f64 {
        self.svm
    }

    pub fn forest(&self) -> f64 {
        self.forest
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.svm, self.forest]
    }
}

impl Default for BsoWeights {
    fn default() -> Self {
        Self {
            svm: constants::DEFAULT_SVM_WEIGHT,
            forest: constants::DEFAULT_FOREST_WEIGHT,
        }
    }
}

// Re-validate on the way in
impl<'de> Deserialize<'de> for BsoWeights {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            svm: f64,
            forest: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        BsoWeights::new(raw.svm, raw.forest).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// HYBRID CLASSIFIER
// ============================================================================

/// Hybrid hyperparameters (the untrained classifier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridClassifier {
    pub svm: SvmClassifier,
    pub forest: RandomForestClassifier,
    pub weights: BsoWeights,
}

impl Default for HybridClassifier {
    fn default() -> Self {
        Self {
            svm: SvmClassifier::new(SvmKernel::Rbf, 1.0, 0.1),
            forest: RandomForestClassifier::new(15, 6, 3),
            weights: BsoWeights::default(),
        }
    }
}

impl HybridClassifier {
    pub fn with_weights(mut self, weights: BsoWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Seed both sub-models; the forest gets `seed + 1`
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.svm.seed = seed;
        self.forest.seed = seed.map(|s| s.wrapping_add(1));
        self
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "svm_weight": self.weights.svm(),
            "forest_weight": self.weights.forest(),
        })
    }
}

impl Trainable for HybridClassifier {
    type Model = TrainedHybrid;

    const NAME: &'static str = "Hybrid SVM-RF";

    fn train(&self, data: &[TrainingData]) -> ModelResult<TrainedHybrid> {
        if data.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        log::info!("Training hybrid SVM-RF model with {} samples", data.len());

        let svm = self.svm.train(data)?;
        let forest = self.forest.train(data)?;

        log::info!(
            "Hybrid training completed (weights: SVM={:.3}, RF={:.3})",
            self.weights.svm(),
            self.weights.forest()
        );

        Ok(TrainedHybrid {
            svm,
            forest,
            weights: self.weights,
        })
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo::new(Self::NAME, self.parameters(), false)
            .with_components(vec![self.svm.describe(), self.forest.describe()])
    }
}

/// Fitted hybrid model
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedHybrid {
    svm: TrainedSvm,
    forest: TrainedForest,
    weights: BsoWeights,
}

impl TrainedHybrid {
    pub fn set_weights(&mut self, weights: BsoWeights) {
        self.weights = weights;
    }

    pub fn weights(&self) -> BsoWeights {
        self.weights
    }

    pub fn svm(&self) -> &TrainedSvm {
        &self.svm
    }

    pub fn forest(&self) -> &TrainedForest {
        &self.forest
    }
}

impl Classifier for TrainedHybrid {
    fn probabilities(&self, features: &ProcessedFeatures) -> ClassProbabilities {
        let svm = self.svm.probabilities(features);
        let forest = self.forest.probabilities(features);
        ClassProbabilities::blend(&svm, self.weights.svm(), &forest, self.weights.forest())
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new(
            HybridClassifier::NAME,
            serde_json::json!({
                "svm_weight": self.weights.svm(),
                "forest_weight": self.weights.forest(),
            }),
            true,
        )
        .with_components(vec![self.svm.model_info(), self.forest.model_info()])
    }
}
