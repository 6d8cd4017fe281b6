//! Model errors

use thiserror::Error;

use crate::logic::features::LayoutMismatchError;

/// Errors raised by training, classification, and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// `train` called with no samples
    #[error("Training data is required: empty training set")]
    EmptyTrainingSet,

    /// `evaluate` called with no samples
    #[error("Test data is required: empty test set")]
    EmptyTestSet,

    /// Model used before a successful `train`
    #[error("{model} must be trained before prediction")]
    NotTrained { model: &'static str },

    /// Vector width differs from the fitted layout
    #[error("Feature length mismatch: expected {expected}, got {got}")]
    FeatureLengthMismatch { expected: usize, got: usize },

    /// NaN or infinite feature value
    #[error("Non-finite feature value at index {index}")]
    NonFiniteFeature { index: usize },

    /// Rejected hybrid weight vector
    #[error("Invalid BSO weights: {0}")]
    InvalidWeights(String),

    /// Rejected hyperparameters
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),
}

/// Result type alias for model operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;
