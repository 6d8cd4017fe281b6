//! Logic Module - Detection pipeline
//!
//! ## Structure
//! - `traffic/` - Packet records, synthetic source, sliding window
//! - `features/` - Window summaries and per-classifier vectors
//! - `model/` - SVM, Random Forest, hybrid combiner, evaluation
//! - `threat/` - Class labels and classification results
//! - `engine` - Thread-safe pipeline front door

pub mod config;
pub mod engine;
pub mod validation;

pub mod features;
pub mod model;
pub mod threat;
pub mod traffic;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG when seeded, OS entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
