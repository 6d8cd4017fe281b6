//! Threat Types
//!
//! Core types for traffic classification.
//! No classification logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::ProcessedFeatures;
use super::rules::{PROBABILITY_TOLERANCE, SVM_TARGET_DDOS, SVM_TARGET_NORMAL, SVM_TARGET_SUSPICIOUS};

// ============================================================================
// TRAFFIC CLASS
// ============================================================================

/// Traffic classification labels, shared by every model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficClass {
    /// Ordinary device chatter
    Normal,
    /// Reconnaissance-like behaviour (scans, probing)
    Suspicious,
    /// Volumetric or protocol flood
    Ddos,
}

impl TrafficClass {
    /// Fixed class order used by probability triples and confusion matrices
    pub const ALL: [TrafficClass; 3] = [
        TrafficClass::Normal,
        TrafficClass::Suspicious,
        TrafficClass::Ddos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficClass::Normal => "normal",
            TrafficClass::Suspicious => "suspicious",
            TrafficClass::Ddos => "ddos",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            TrafficClass::Normal => 0,
            TrafficClass::Suspicious => 1,
            TrafficClass::Ddos => 2,
        }
    }

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        self.severity_level() as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Regression target used by the SVM
    pub fn svm_target(&self) -> f64 {
        match self {
            TrafficClass::Normal => SVM_TARGET_NORMAL,
            TrafficClass::Suspicious => SVM_TARGET_SUSPICIOUS,
            TrafficClass::Ddos => SVM_TARGET_DDOS,
        }
    }
}

impl std::fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASS PROBABILITIES
// ============================================================================

/// Per-class probability triple
///
/// Always non-negative and summing to 1 when built through the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub normal: f64,
    pub suspicious: f64,
    pub ddos: f64,
}

impl ClassProbabilities {
    /// Normalize raw non-negative scores
    ///
    /// Negative or non-finite scores count as zero. All-zero input gives the
    /// uniform distribution.
    pub fn from_scores(normal: f64, suspicious: f64, ddos: f64) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let (normal, suspicious, ddos) = (clean(normal), clean(suspicious), clean(ddos));
        let total = normal + suspicious + ddos;

        if total <= 0.0 {
            return Self::uniform();
        }

        Self {
            normal: normal / total,
            suspicious: suspicious / total,
            ddos: ddos / total,
        }
    }

    /// Vote shares, indexed like `TrafficClass::ALL`
    pub fn from_votes(votes: [usize; 3]) -> Self {
        Self::from_scores(votes[0] as f64, votes[1] as f64, votes[2] as f64)
    }

    pub fn uniform() -> Self {
        Self {
            normal: 1.0 / 3.0,
            suspicious: 1.0 / 3.0,
            ddos: 1.0 / 3.0,
        }
    }

    /// Convex combination of two triples
    pub fn blend(a: &Self, weight_a: f64, b: &Self, weight_b: f64) -> Self {
        Self::from_scores(
            weight_a * a.normal + weight_b * b.normal,
            weight_a * a.suspicious + weight_b * b.suspicious,
            weight_a * a.ddos + weight_b * b.ddos,
        )
    }

    pub fn get(&self, class: TrafficClass) -> f64 {
        match class {
            TrafficClass::Normal => self.normal,
            TrafficClass::Suspicious => self.suspicious,
            TrafficClass::Ddos => self.ddos,
        }
    }

    pub fn sum(&self) -> f64 {
        self.normal + self.suspicious + self.ddos
    }

    pub fn is_normalized(&self) -> bool {
        TrafficClass::ALL.iter().all(|c| self.get(*c) >= 0.0)
            && (self.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }

    /// Most probable class and its probability
    ///
    /// Strictly-greater comparison in `ALL` order: ties resolve to Normal.
    pub fn argmax(&self) -> (TrafficClass, f64) {
        let mut best = TrafficClass::Normal;
        let mut confidence = self.normal;

        for class in [TrafficClass::Suspicious, TrafficClass::Ddos] {
            let p = self.get(class);
            if p > confidence {
                best = class;
                confidence = p;
            }
        }

        (best, confidence)
    }
}

impl Default for ClassProbabilities {
    fn default() -> Self {
        Self::uniform()
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// Result of one classification call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub prediction: TrafficClass,
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
    pub features: ProcessedFeatures,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    /// Build a result from a probability triple (prediction = argmax)
    pub fn from_probabilities(probabilities: ClassProbabilities, features: &ProcessedFeatures) -> Self {
        let (prediction, confidence) = probabilities.argmax();
        Self {
            prediction,
            confidence,
            probabilities,
            features: features.clone(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_serializes_lowercase() {
        let json = serde_json::to_string(&TrafficClass::Ddos).unwrap();
        assert_eq!(json, "\"ddos\"");
        let back: TrafficClass = serde_json::from_str("\"suspicious\"").unwrap();
        assert_eq!(back, TrafficClass::Suspicious);
    }

    #[test]
    fn test_from_scores_normalizes() {
        let p = ClassProbabilities::from_scores(2.0, 1.0, 1.0);
        assert!(p.is_normalized());
        assert_eq!(p.normal, 0.5);
    }

    #[test]
    fn test_zero_scores_give_uniform() {
        let p = ClassProbabilities::from_scores(0.0, 0.0, 0.0);
        assert!(p.is_normalized());
        assert_eq!(p.argmax().0, TrafficClass::Normal);
    }

    #[test]
    fn test_argmax_tie_breaks_to_normal() {
        let p = ClassProbabilities::from_votes([2, 2, 0]);
        assert_eq!(p.argmax(), (TrafficClass::Normal, 0.5));

        let p = ClassProbabilities::from_votes([0, 3, 3]);
        assert_eq!(p.argmax().0, TrafficClass::Suspicious);
    }

    #[test]
    fn test_blend_stays_normalized() {
        let a = ClassProbabilities::from_votes([1, 0, 0]);
        let b = ClassProbabilities::from_votes([0, 0, 1]);
        let mixed = ClassProbabilities::blend(&a, 0.6, &b, 0.4);

        assert!(mixed.is_normalized());
        assert!((mixed.normal - 0.6).abs() < 1e-12);
        assert!((mixed.ddos - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_index_roundtrip() {
        for class in TrafficClass::ALL {
            assert_eq!(TrafficClass::from_index(class.index()), Some(class));
        }
        assert_eq!(TrafficClass::from_index(3), None);
    }
}
