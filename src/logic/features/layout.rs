//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the classifier input schema**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Each classifier family reads its own layout. A trained model keeps the
//! `LayoutInfo` it was fitted on and rejects vectors built for another one.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUTS (Authoritative source)
// ============================================================================

/// SVM input: every value scaled to roughly 0..1
pub const SVM_LAYOUT: &[&str] = &[
    "packet_rate_scaled",      // 0: packet_rate / 1000
    "avg_size_scaled",         // 1: avg_packet_size / 1500
    "entropy_scaled",          // 2: entropy_score / 10
    "protocol_diversity",      // 3: distinct protocols / 10
    "flag_diversity",          // 4: distinct TCP flags / 10
    "log_packet_rate",         // 5: ln(packet_rate + 1) / 10
    "large_packets",           // 6: avg_packet_size > 1000
    "low_entropy",             // 7: entropy_score < 2
    "high_rate",               // 8: packet_rate > 500
    "dominant_protocol_share", // 9: busiest protocol / packet count
];

/// Random Forest input: raw magnitudes, trees do not need scaling
pub const FOREST_LAYOUT: &[&str] = &[
    "packet_rate",             // 0
    "avg_packet_size",         // 1
    "entropy_score",           // 2
    "protocol_count",          // 3: distinct protocols
    "flag_count",              // 4: distinct TCP flags
    "elevated_rate",           // 5: packet_rate > 100
    "large_packets",           // 6: avg_packet_size > 800
    "low_entropy",             // 7: entropy_score < 3
];

pub const SVM_FEATURE_COUNT: usize = 10;
pub const FOREST_FEATURE_COUNT: usize = 8;

/// Which classifier input schema a vector follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureLayout {
    Svm,
    Forest,
}

impl FeatureLayout {
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            FeatureLayout::Svm => SVM_LAYOUT,
            FeatureLayout::Forest => FOREST_LAYOUT,
        }
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    pub fn hash(&self) -> u32 {
        compute_layout_hash(self.names())
    }

    /// Feature index by name (O(n) but features are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names().iter().position(|&n| n == name)
    }

    /// Feature name by index
    pub fn name_of(&self, index: usize) -> Option<&'static str> {
        self.names().get(index).copied()
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of version + ordered feature names
pub fn compute_layout_hash(names: &[&str]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub layout: FeatureLayout,
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current(layout: FeatureLayout) -> Self {
        Self {
            layout,
            version: FEATURE_VERSION,
            hash: layout.hash(),
            feature_count: layout.len(),
            feature_names: layout.names().iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check an incoming vector header against this recorded layout
    pub fn check(&self, layout: FeatureLayout, version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
        if layout != self.layout || version != self.version || hash != self.hash {
            return Err(LayoutMismatchError {
                layout: self.layout,
                expected_version: self.version,
                expected_hash: self.hash,
                actual_version: version,
                actual_hash: hash,
            });
        }
        Ok(())
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMismatchError {
    pub layout: FeatureLayout,
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch ({:?}): expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.layout,
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches the current layout
pub fn validate_layout(
    layout: FeatureLayout,
    incoming_version: u8,
    incoming_hash: u32,
) -> Result<(), LayoutMismatchError> {
    let current_hash = layout.hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            layout,
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_counts() {
        assert_eq!(SVM_LAYOUT.len(), SVM_FEATURE_COUNT);
        assert_eq!(FOREST_LAYOUT.len(), FOREST_FEATURE_COUNT);
        assert_eq!(FeatureLayout::Svm.len(), 10);
        assert_eq!(FeatureLayout::Forest.len(), 8);
    }

    #[test]
    fn test_layout_hashes_differ() {
        assert_ne!(FeatureLayout::Svm.hash(), FeatureLayout::Forest.hash());
        assert_eq!(FeatureLayout::Svm.hash(), FeatureLayout::Svm.hash());
        assert_ne!(FeatureLayout::Forest.hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        let layout = FeatureLayout::Forest;
        assert!(validate_layout(layout, FEATURE_VERSION, layout.hash()).is_ok());
        assert!(validate_layout(layout, FEATURE_VERSION + 1, layout.hash()).is_err());

        let err = validate_layout(layout, FEATURE_VERSION, FeatureLayout::Svm.hash()).unwrap_err();
        assert_eq!(err.expected_hash, layout.hash());
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(FeatureLayout::Svm.index_of("packet_rate_scaled"), Some(0));
        assert_eq!(FeatureLayout::Svm.index_of("dominant_protocol_share"), Some(9));
        assert_eq!(FeatureLayout::Forest.index_of("low_entropy"), Some(7));
        assert_eq!(FeatureLayout::Forest.index_of("nonexistent"), None);
        assert_eq!(FeatureLayout::Forest.name_of(100), None);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current(FeatureLayout::Svm);
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, info.feature_names.len());
    }

    #[test]
    fn test_layout_info_check() {
        let info = LayoutInfo::current(FeatureLayout::Svm);
        assert!(info.check(FeatureLayout::Svm, FEATURE_VERSION, FeatureLayout::Svm.hash()).is_ok());

        let err = info
            .check(FeatureLayout::Forest, FEATURE_VERSION, FeatureLayout::Forest.hash())
            .unwrap_err();
        assert_eq!(err.layout, FeatureLayout::Svm);
        assert_eq!(err.actual_hash, FeatureLayout::Forest.hash());

        assert!(info.check(FeatureLayout::Svm, FEATURE_VERSION + 1, info.hash).is_err());
    }
}
