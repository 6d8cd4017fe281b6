//! Feature Vector - Core data structure for classifier input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses the layouts from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks

use serde::{Deserialize, Serialize};
use super::layout::{validate_layout, FeatureLayout, LayoutMismatchError, FEATURE_VERSION};
use super::processed::ProcessedFeatures;

// ============================================================================
// PROJECTION THRESHOLDS
// ============================================================================

const SVM_LARGE_PACKET_BYTES: f64 = 1000.0;
const SVM_LOW_ENTROPY_BITS: f64 = 2.0;
const SVM_HIGH_RATE_PPS: f64 = 500.0;

const FOREST_ELEVATED_RATE_PPS: f64 = 100.0;
const FOREST_LARGE_PACKET_BYTES: f64 = 800.0;
const FOREST_LOW_ENTROPY_BITS: f64 = 3.0;

fn indicator(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub layout: FeatureLayout,
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in layout order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Project a window summary onto `layout`
    pub fn project(layout: FeatureLayout, features: &ProcessedFeatures) -> Self {
        let values = match layout {
            FeatureLayout::Svm => svm_values(features),
            FeatureLayout::Forest => forest_values(features),
        };
        Self {
            layout,
            version: FEATURE_VERSION,
            layout_hash: layout.hash(),
            values,
        }
    }

    pub fn svm(features: &ProcessedFeatures) -> Self {
        Self::project(FeatureLayout::Svm, features)
    }

    pub fn forest(features: &ProcessedFeatures) -> Self {
        Self::project(FeatureLayout::Forest, features)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.layout.index_of(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with the current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.layout, self.version, self.layout_hash)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout": self.layout,
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": self.layout.names().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

fn svm_values(f: &ProcessedFeatures) -> Vec<f64> {
    vec![
        f.packet_rate / 1000.0,
        f.avg_packet_size / 1500.0,
        f.entropy_score / 10.0,
        f.protocol_diversity() as f64 / 10.0,
        f.flag_diversity() as f64 / 10.0,
        (f.packet_rate + 1.0).ln() / 10.0,
        indicator(f.avg_packet_size > SVM_LARGE_PACKET_BYTES),
        indicator(f.entropy_score < SVM_LOW_ENTROPY_BITS),
        indicator(f.packet_rate > SVM_HIGH_RATE_PPS),
        f.dominant_protocol_share(),
    ]
}

fn forest_values(f: &ProcessedFeatures) -> Vec<f64> {
    vec![
        f.packet_rate,
        f.avg_packet_size,
        f.entropy_score,
        f.protocol_diversity() as f64,
        f.flag_diversity() as f64,
        indicator(f.packet_rate > FOREST_ELEVATED_RATE_PPS),
        indicator(f.avg_packet_size > FOREST_LARGE_PACKET_BYTES),
        indicator(f.entropy_score < FOREST_LOW_ENTROPY_BITS),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
