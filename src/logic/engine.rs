//! Detection Engine
//!
//! Ties the sliding traffic window, the feature extractor and the hybrid
//! model together. Shareable across threads behind `Arc`: packets are
//! ingested through `&self`, training takes the model write lock, and
//! classification only a read lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::config::DetectorConfig;
use crate::logic::features::{FeatureExtractor, FeatureVector, ProcessedFeatures};
use crate::logic::model::{
    EvaluationReport, HybridClassifier, ModelHandle, ModelInfo, ModelResult, TrainingData,
};
use crate::logic::threat::{ClassificationResult, TrafficClass};
use crate::logic::traffic::{NetworkPacket, TrafficWindow, WindowStatus};
use crate::logic::validation;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Engine status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_trained: bool,
    pub model_type: String,
    pub bso_weights: [f64; 2],
    pub window: WindowStatus,
    pub classification_count: u64,
    pub avg_latency_us: f64,
}

pub struct DetectionEngine {
    window: TrafficWindow,
    extractor: FeatureExtractor,
    model: RwLock<ModelHandle<HybridClassifier>>,
    classification_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl DetectionEngine {
    pub fn new(extractor: FeatureExtractor, window_capacity: usize, hybrid: HybridClassifier) -> Self {
        Self {
            window: TrafficWindow::new(extractor.window_secs(), window_capacity),
            extractor,
            model: RwLock::new(ModelHandle::new(hybrid)),
            classification_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> ModelResult<Self> {
        config.validate().into_result("detector config")?;
        let extractor =
            FeatureExtractor::new(config.window_secs).with_volume_baseline(config.volume_baseline_bps);
        Ok(Self::new(extractor, config.window_capacity, config.hybrid()?))
    }

    // ========================================================================
    // TRAFFIC
    // ========================================================================

    pub fn ingest(&self, packet: NetworkPacket) {
        self.window.push(packet);
    }

    pub fn ingest_batch<I: IntoIterator<Item = NetworkPacket>>(&self, packets: I) {
        self.window.extend(packets);
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    // ========================================================================
    // MODEL
    // ========================================================================

    pub fn train(&self, data: &[TrainingData]) -> ModelResult<()> {
        let report = validation::validate_training_set(data);
        for warning in &report.warnings {
            log::warn!("Training set: {}", warning);
        }
        self.model.write().train(data)
    }

    /// Classify the current window as of `now_ms`
    ///
    /// Expired packets are evicted first.
    pub fn analyze(&self, now_ms: i64) -> ModelResult<ClassificationResult> {
        let evicted = self.window.evict_older_than(now_ms);
        if evicted > 0 {
            log::debug!("Evicted {} expired packets", evicted);
        }

        let features = self.extractor.extract(&self.window.snapshot(), now_ms);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("SVM input: {}", FeatureVector::svm(&features).to_log_entry());
            log::trace!("Forest input: {}", FeatureVector::forest(&features).to_log_entry());
        }
        self.classify_features(&features)
    }

    pub fn classify_features(&self, features: &ProcessedFeatures) -> ModelResult<ClassificationResult> {
        let start = Instant::now();
        let result = self.model.read().classify(features)?;
        let elapsed_us = start.elapsed().as_micros() as u64;

        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.classification_count.fetch_add(1, Ordering::Relaxed);

        if result.prediction != TrafficClass::Normal {
            log::warn!(
                "Traffic classified as {} (confidence {:.2}, {} packets)",
                result.prediction,
                result.confidence,
                features.packet_count
            );
        }

        Ok(result)
    }

    pub fn set_bso_weights(&self, weights: &[f64]) -> ModelResult<()> {
        self.model.write().set_bso_weights(weights)
    }

    pub fn evaluate(&self, test: &[TrainingData]) -> ModelResult<EvaluationReport> {
        self.model.read().evaluate(test)
    }

    pub fn model_info(&self) -> ModelInfo {
        self.model.read().model_info()
    }

    pub fn is_trained(&self) -> bool {
        self.model.read().is_trained()
    }

    pub fn status(&self) -> EngineStatus {
        let model = self.model.read();
        let count = self.classification_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { sum as f64 / count as f64 } else { 0.0 };

        EngineStatus {
            model_trained: model.is_trained(),
            model_type: model.model_info().model_type,
            bso_weights: model.weights().as_array(),
            window: self.window.status(),
            classification_count: count,
            avg_latency_us: avg,
        }
    }
}
