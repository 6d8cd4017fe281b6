//! Model Types
//!
//! Training samples, model descriptions, and the two traits every
//! classifier family implements.

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureLayout, FeatureVector, ProcessedFeatures};
use crate::logic::threat::{ClassProbabilities, ClassificationResult, TrafficClass};
use super::error::{ModelError, ModelResult};

// ============================================================================
// TRAINING DATA
// ============================================================================

/// One labelled traffic window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub features: ProcessedFeatures,
    pub label: TrafficClass,
}

impl TrainingData {
    pub fn new(features: ProcessedFeatures, label: TrafficClass) -> Self {
        Self { features, label }
    }
}

/// Training sample already projected onto a classifier layout
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledVector {
    pub values: Vec<f64>,
    pub label: TrafficClass,
}

impl LabeledVector {
    pub fn new(values: Vec<f64>, label: TrafficClass) -> Self {
        Self { values, label }
    }
}

/// Project and check a training set for one layout
///
/// Fails on empty input or any non-finite value.
pub fn project_training_set(layout: FeatureLayout, data: &[TrainingData]) -> ModelResult<Vec<LabeledVector>> {
    if data.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }

    let mut samples = Vec::with_capacity(data.len());
    for sample in data {
        let vector = FeatureVector::project(layout, &sample.features);
        vector.validate()?;
        samples.push(LabeledVector::new(vector.values, sample.label));
    }

    check_vectors(&samples)?;
    Ok(samples)
}

/// Shared sanity check: non-empty, equal widths, finite values
pub fn check_vectors(samples: &[LabeledVector]) -> ModelResult<usize> {
    let first = samples.first().ok_or(ModelError::EmptyTrainingSet)?;
    let width = first.values.len();

    for sample in samples {
        if sample.values.len() != width {
            return Err(ModelError::FeatureLengthMismatch {
                expected: width,
                got: sample.values.len(),
            });
        }
        if let Some(index) = sample.values.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { index });
        }
    }

    Ok(width)
}

// ============================================================================
// MODEL INFO
// ============================================================================

/// Description of a model for status displays (`getModelInfo`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub parameters: serde_json::Value,
    pub trained: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ModelInfo>,
}

impl ModelInfo {
    pub fn new(model_type: &str, parameters: serde_json::Value, trained: bool) -> Self {
        Self {
            model_type: model_type.to_string(),
            parameters,
            trained,
            components: Vec::new(),
        }
    }

    pub fn with_components(mut self, components: Vec<ModelInfo>) -> Self {
        self.components = components;
        self
    }
}

// ============================================================================
// CLASSIFIER TRAITS
// ============================================================================

/// A fitted model; only obtainable from `Trainable::train`
pub trait Classifier {
    /// Per-class probabilities for one window summary
    fn probabilities(&self, features: &ProcessedFeatures) -> ClassProbabilities;

    /// Classify one window summary (prediction = argmax)
    fn classify(&self, features: &ProcessedFeatures) -> ClassificationResult {
        ClassificationResult::from_probabilities(self.probabilities(features), features)
    }

    /// Predicted class only
    fn predict_class(&self, features: &ProcessedFeatures) -> TrafficClass {
        self.probabilities(features).argmax().0
    }

    /// Describe the fitted model
    fn model_info(&self) -> ModelInfo;
}

/// Hyperparameters that can be fitted into a `Classifier`
pub trait Trainable {
    type Model: Classifier;

    /// Short name used in errors and logs
    const NAME: &'static str;

    /// Fit a new model; `self` is left untouched
    fn train(&self, data: &[TrainingData]) -> ModelResult<Self::Model>;

    /// Describe the untrained configuration
    fn describe(&self) -> ModelInfo;
}
