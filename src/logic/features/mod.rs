//! Features Module - Feature Extraction Engine
//!
//! Window summaries from raw packets, the versioned per-classifier
//! vectors projected from them, and their sealed transport form.

pub mod extractor;
pub mod layout;
pub mod processed;
pub mod sealed;
pub mod vector;


// Re-export common types
pub use extractor::FeatureExtractor;
pub use layout::{FeatureLayout, LayoutInfo, LayoutMismatchError, FEATURE_VERSION};
pub use processed::ProcessedFeatures;
pub use sealed::{FeatureSealer, SealError};
pub use vector::FeatureVector;
