//! Classification Rules & Tolerances
//!
//! Constants shared by the classifiers.
//! No classification logic here - only constants. Hybrid weight defaults
//! live in `crate::constants`.

// ============================================================================
// LABEL ENCODING
// ============================================================================

/// SVM regression target for Normal traffic
pub const SVM_TARGET_NORMAL: f64 = -1.0;

/// SVM regression target for Suspicious traffic
pub const SVM_TARGET_SUSPICIOUS: f64 = 0.0;

/// SVM regression target for DDoS traffic
pub const SVM_TARGET_DDOS: f64 = 1.0;

// ============================================================================
// TOLERANCES
// ============================================================================

/// Allowed drift of a probability triple's sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Allowed drift of the hybrid weight pair's sum from 1
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;
