//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden from the environment, see the getters below.

/// Trailing window used by the feature extractor (seconds)
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Longest accepted window (one day)
pub const MAX_WINDOW_SECS: u64 = 86_400;

/// Bytes/sec considered normal when scoring volume anomalies (1 MB/s)
pub const DEFAULT_VOLUME_BASELINE_BPS: f64 = 1_000_000.0;

/// Upper bound of the volume anomaly ratio
pub const VOLUME_ANOMALY_CAP: f64 = 5.0;

/// Labelled windows generated for training by the demo binary
pub const DEFAULT_TRAINING_WINDOWS: usize = 120;

/// Labelled windows held out for evaluation by the demo binary
pub const DEFAULT_TEST_WINDOWS: usize = 45;

/// Default SVM share of the hybrid vote
pub const DEFAULT_SVM_WEIGHT: f64 = 0.6;

/// Default Random Forest share of the hybrid vote
pub const DEFAULT_FOREST_WEIGHT: f64 = 0.4;

/// Packet capacity of the sliding traffic window
pub const DEFAULT_WINDOW_CAPACITY: usize = 100_000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "BSO DDoS Core";

/// Window length in milliseconds, clamped to `1..=MAX_WINDOW_SECS`
pub fn window_millis(window_secs: u64) -> i64 {
    window_secs.clamp(1, MAX_WINDOW_SECS) as i64 * 1000
}

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get feature window length from environment or use default
pub fn get_window_secs() -> u64 {
    std::env::var("DDOS_WINDOW_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| (1..=MAX_WINDOW_SECS).contains(secs))
        .unwrap_or(DEFAULT_WINDOW_SECS)
}

/// Get RNG seed from environment (None = seed from OS entropy)
pub fn get_seed() -> Option<u64> {
    std::env::var("DDOS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Get number of training windows from environment or use default
pub fn get_training_windows() -> usize {
    std::env::var("DDOS_TRAINING_WINDOWS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TRAINING_WINDOWS)
}

/// Get number of evaluation windows from environment or use default
pub fn get_test_windows() -> usize {
    std::env::var("DDOS_TEST_WINDOWS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TEST_WINDOWS)
}

/// Get feature sealing passphrase from environment (None = no sealing)
pub fn get_seal_key() -> Option<String> {
    std::env::var("DDOS_SEAL_KEY")
        .ok()
        .filter(|s| !s.is_empty())
}

/// Get SVM hybrid weight from environment or use default
pub fn get_svm_weight() -> f64 {
    std::env::var("DDOS_SVM_WEIGHT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SVM_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_millis_clamped() {
        assert_eq!(window_millis(60), 60_000);
        assert_eq!(window_millis(0), 1_000);
        assert_eq!(window_millis(u64::MAX), MAX_WINDOW_SECS as i64 * 1000);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((DEFAULT_SVM_WEIGHT + DEFAULT_FOREST_WEIGHT - 1.0).abs() < 1e-12);
    }
}
