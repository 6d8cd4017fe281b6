//! BSO DDoS Core
//!
//! Three-class (Normal / Suspicious / DDoS) traffic classification over
//! sliding packet windows: feature extraction, an SVM, a Random Forest, and
//! their BSO-weighted hybrid.

pub mod constants;
pub mod logic;

pub use logic::config::DetectorConfig;
pub use logic::engine::{DetectionEngine, EngineStatus};
pub use logic::features::{FeatureExtractor, ProcessedFeatures};
pub use logic::model::{
    BsoWeights, Classifier, HybridClassifier, ModelError, ModelHandle, ModelInfo, ModelMetrics, ModelResult,
    RandomForestClassifier, SvmClassifier, Trainable, TrainingData,
};
pub use logic::threat::{ClassProbabilities, ClassificationResult, TrafficClass};
pub use logic::traffic::{NetworkPacket, SyntheticTrafficGenerator};
