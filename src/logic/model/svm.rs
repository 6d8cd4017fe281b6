//! SVM Classifier (simplified)
//!
//! Weight-vector classifier fitted with a perceptron-style update:
//! score = w·x + b (squashed by tanh(γ·score) under the RBF variant),
//! error = target − score, w += lr·error·x. Labels map to −1 / 0 / +1.

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureLayout, FeatureVector, LayoutInfo, ProcessedFeatures};
use crate::logic::threat::ClassProbabilities;
use crate::logic::validation;
use super::error::{ModelError, ModelResult};
use super::types::{project_training_set, Classifier, ModelInfo, Trainable, TrainingData};

/// Hard ceiling on training epochs
pub const MAX_EPOCHS: usize = 100;

/// Half-width of the uniform initial weight range
const INIT_WEIGHT_RANGE: f64 = 0.05;

/// Score transform applied after the linear combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvmKernel {
    Linear,
    Rbf,
}

/// SVM hyperparameters (the untrained classifier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmClassifier {
    pub kernel: SvmKernel,
    /// Regularization strength, reported only
    pub c: f64,
    /// Slope of the tanh squashing under `Rbf`
    pub gamma: f64,
    pub learning_rate: f64,
    pub max_epochs: usize,
    /// Early stop once an epoch's total |error| drops below this
    pub tolerance: f64,
    pub seed: Option<u64>,
}

impl Default for SvmClassifier {
    fn default() -> Self {
        Self {
            kernel: SvmKernel::Rbf,
            c: 1.0,
            gamma: 0.1,
            learning_rate: 0.01,
            max_epochs: MAX_EPOCHS,
            tolerance: 0.1,
            seed: None,
        }
    }
}

impl SvmClassifier {
    pub fn new(kernel: SvmKernel, c: f64, gamma: f64) -> Self {
        Self {
            kernel,
            c,
            gamma,
            ..Default::default()
        }
    }

    pub fn linear() -> Self {
        Self::new(SvmKernel::Linear, 1.0, 0.1)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn parameters(&self, feature_count: usize) -> serde_json::Value {
        serde_json::json!({
            "kernel": self.kernel,
            "c": self.c,
            "gamma": self.gamma,
            "learning_rate": self.learning_rate,
            "max_epochs": self.max_epochs,
            "feature_count": feature_count,
        })
    }
}

fn kernel_score(kernel: SvmKernel, gamma: f64, linear: f64) -> f64 {
    match kernel {
        SvmKernel::Linear => linear,
        SvmKernel::Rbf => (linear * gamma).tanh(),
    }
}

impl Trainable for SvmClassifier {
    type Model = TrainedSvm;

    const NAME: &'static str = "SVM";

    fn train(&self, data: &[TrainingData]) -> ModelResult<TrainedSvm> {
        validation::validate_svm_config(self).into_result(Self::NAME)?;
        let samples = project_training_set(FeatureLayout::Svm, data)?;

        log::info!("Training SVM classifier with {} samples", samples.len());

        let mut rng = crate::logic::seeded_rng(self.seed);
        let width = FeatureLayout::Svm.len();
        let mut weights: Array1<f64> =
            Array1::from_shape_fn(width, |_| rng.gen_range(-INIT_WEIGHT_RANGE..INIT_WEIGHT_RANGE));
        let mut bias: f64 = rng.gen_range(-INIT_WEIGHT_RANGE..INIT_WEIGHT_RANGE);

        let mut epochs_run = 0;
        let mut final_loss = f64::INFINITY;

        for epoch in 0..self.max_epochs.min(MAX_EPOCHS) {
            let mut total_loss = 0.0;

            for sample in &samples {
                let x = ArrayView1::from(sample.values.as_slice());
                let prediction = kernel_score(self.kernel, self.gamma, weights.dot(&x) + bias);
                let error = sample.label.svm_target() - prediction;

                weights.scaled_add(self.learning_rate * error, &x);
                bias += self.learning_rate * error;

                total_loss += error.abs();
            }

            epochs_run = epoch + 1;
            final_loss = total_loss;
            log::trace!("SVM epoch {}: total |error| {:.4}", epochs_run, total_loss);

            if total_loss < self.tolerance {
                log::debug!("SVM early stop after {} epochs", epochs_run);
                break;
            }
        }

        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::InvalidConfig(format!(
                "SVM training diverged with learning rate {}",
                self.learning_rate
            )));
        }

        log::info!(
            "SVM training completed: {} epochs, final loss {:.4}",
            epochs_run,
            final_loss
        );

        Ok(TrainedSvm {
            config: self.clone(),
            layout: LayoutInfo::current(FeatureLayout::Svm),
            weights,
            bias,
            epochs_run,
            final_loss,
        })
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo::new(Self::NAME, self.parameters(FeatureLayout::Svm.len()), false)
    }
}

/// Fitted SVM
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedSvm {
    config: SvmClassifier,
    /// Layout the weights were fitted on
    layout: LayoutInfo,
    weights: Array1<f64>,
    bias: f64,
    epochs_run: usize,
    final_loss: f64,
}

impl TrainedSvm {
    /// Raw scalar score for an SVM-layout vector
    pub fn predict(&self, vector: &[f64]) -> ModelResult<f64> {
        if vector.len() != self.weights.len() {
            return Err(ModelError::FeatureLengthMismatch {
                expected: self.weights.len(),
                got: vector.len(),
            });
        }
        if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { index });
        }
        Ok(self.raw_score(ArrayView1::from(vector)))
    }

    /// Raw scalar score for a versioned vector
    ///
    /// Vectors built for another layout or version are rejected.
    pub fn predict_vector(&self, vector: &FeatureVector) -> ModelResult<f64> {
        self.layout.check(vector.layout, vector.version, vector.layout_hash)?;
        self.predict(vector.as_slice())
    }

    /// Raw scalar score for a window summary
    pub fn score(&self, features: &ProcessedFeatures) -> ModelResult<f64> {
        self.predict_vector(&FeatureVector::svm(features))
    }

    /// Symmetric exponential kernel around the −1 / 0 / +1 targets
    pub fn probabilities_for_score(score: f64) -> ClassProbabilities {
        ClassProbabilities::from_scores(
            (-(score + 1.0).abs()).exp(),
            (-score.abs()).exp(),
            (-(score - 1.0).abs()).exp(),
        )
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }

    pub fn config(&self) -> &SvmClassifier {
        &self.config
    }

    pub fn layout(&self) -> &LayoutInfo {
        &self.layout
    }

    fn raw_score(&self, x: ArrayView1<f64>) -> f64 {
        kernel_score(self.config.kernel, self.config.gamma, self.weights.dot(&x) + self.bias)
    }
}

impl Classifier for TrainedSvm {
    fn probabilities(&self, features: &ProcessedFeatures) -> ClassProbabilities {
        match self.score(features) {
            Ok(score) => Self::probabilities_for_score(score),
            Err(e) => {
                log::warn!("SVM scoring failed, falling back to uniform: {}", e);
                ClassProbabilities::uniform()
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        let mut parameters = self.config.parameters(self.weights.len());
        parameters["epochs_run"] = serde_json::json!(self.epochs_run);
        parameters["final_loss"] = serde_json::json!(self.final_loss);
        parameters["feature_version"] = serde_json::json!(self.layout.version);
        parameters["layout_hash"] = serde_json::json!(format!("{:08x}", self.layout.hash));
        ModelInfo::new(SvmClassifier::NAME, parameters, true)
    }
}
