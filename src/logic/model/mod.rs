//! Model Module - Classifiers
//!
//! SVM, Random Forest and the BSO-weighted hybrid, each split into an
//! untrained configuration (`Trainable`) and a fitted model (`Classifier`).

pub mod error;
pub mod forest;
pub mod handle;
pub mod hybrid;
pub mod metrics;
pub mod svm;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use forest::{RandomForestClassifier, TrainedForest};
pub use handle::ModelHandle;
pub use hybrid::{BsoWeights, HybridClassifier, TrainedHybrid};
pub use metrics::{evaluate, ClassReport, ConfusionMatrix, EvaluationReport, ModelMetrics};
pub use svm::{SvmClassifier, SvmKernel, TrainedSvm};
pub use tree::{DecisionTree, TreeNode};
pub use types::{Classifier, LabeledVector, ModelInfo, Trainable, TrainingData};
