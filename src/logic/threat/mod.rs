//! Threat Module
//!
//! Shared labels and result types for Normal/Suspicious/DDoS classification.
//!
//! ## Structure
//! - `types`: Core types (TrafficClass, ClassProbabilities, ClassificationResult)
//! - `rules`: Label encoding and tolerances
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{ClassProbabilities, TrafficClass};
//!
//! let probs = ClassProbabilities::from_votes([3, 1, 6]);
//! match probs.argmax().0 {
//!     TrafficClass::Normal => println!("Safe"),
//!     TrafficClass::Suspicious => println!("Monitor"),
//!     TrafficClass::Ddos => println!("Mitigate"),
//! }
//! ```

pub mod types;
pub mod rules;

// Re-export main types for convenience
pub use types::{
    TrafficClass,
    ClassProbabilities,
    ClassificationResult,
};

pub use rules::{
    PROBABILITY_TOLERANCE,
    WEIGHT_SUM_TOLERANCE,
};
