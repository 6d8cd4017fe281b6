//! Model Handle
//!
//! Stateful wrapper pairing a configuration with its optional fitted model.
//! Classification before a successful `train` returns `NotTrained`.

use crate::logic::features::ProcessedFeatures;
use crate::logic::threat::ClassificationResult;
use super::error::{ModelError, ModelResult};
use super::hybrid::{BsoWeights, HybridClassifier};
use super::metrics::{self, EvaluationReport, ModelMetrics};
use super::svm::SvmClassifier;
use super::types::{Classifier, ModelInfo, Trainable, TrainingData};

pub struct ModelHandle<T: Trainable> {
    trainer: T,
    model: Option<T::Model>,
}

impl<T: Trainable + Default> Default for ModelHandle<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Trainable> ModelHandle<T> {
    pub fn new(trainer: T) -> Self {
        Self { trainer, model: None }
    }

    /// Fit (or refit) the model
    ///
    /// On failure any previous model is dropped and the handle is untrained.
    pub fn train(&mut self, data: &[TrainingData]) -> ModelResult<()> {
        self.model = None;
        match self.trainer.train(data) {
            Ok(model) => {
                self.model = Some(model);
                Ok(())
            }
            Err(e) => {
                log::warn!("{} training failed: {}", T::NAME, e);
                Err(e)
            }
        }
    }

    pub fn classify(&self, features: &ProcessedFeatures) -> ModelResult<ClassificationResult> {
        Ok(self.model()?.classify(features))
    }

    /// Fitted model description, or the configuration with `trained: false`
    pub fn model_info(&self) -> ModelInfo {
        match &self.model {
            Some(model) => model.model_info(),
            None => self.trainer.describe(),
        }
    }

    pub fn evaluate(&self, test: &[TrainingData]) -> ModelResult<EvaluationReport> {
        metrics::evaluate(self.model()?, test)
    }

    /// Pooled metrics only (`evaluateModel`)
    pub fn evaluate_model(&self, test: &[TrainingData]) -> ModelResult<ModelMetrics> {
        self.evaluate(test).map(|report| report.metrics)
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> ModelResult<&T::Model> {
        self.model.as_ref().ok_or(ModelError::NotTrained { model: T::NAME })
    }

    pub fn config(&self) -> &T {
        &self.trainer
    }
}

impl ModelHandle<SvmClassifier> {
    /// Raw SVM score for an SVM-layout vector
    pub fn predict(&self, vector: &[f64]) -> ModelResult<f64> {
        self.model()?.predict(vector)
    }
}

impl ModelHandle<HybridClassifier> {
    /// Replace the combination weights
    ///
    /// Applies to the fitted model and to future retrains. Rejected weights
    /// leave both untouched.
    pub fn set_bso_weights(&mut self, weights: &[f64]) -> ModelResult<()> {
        let weights = BsoWeights::try_from_slice(weights)?;
        self.trainer.weights = weights;
        if let Some(model) = self.model.as_mut() {
            model.set_weights(weights);
        }
        log::info!(
            "BSO weights updated: SVM={:.3}, RF={:.3}",
            weights.svm(),
            weights.forest()
        );
        Ok(())
    }

    pub fn weights(&self) -> BsoWeights {
        self.trainer.weights
    }
}
