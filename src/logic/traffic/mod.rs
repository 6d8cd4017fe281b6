//! Traffic Module - packet model and sources
//!
//! Packet records, the synthetic placeholder source, and the sliding window
//! that buffers packets in front of the feature extractor.

pub mod packet;
pub mod generator;
pub mod window;

// Re-export common types
pub use packet::{AttackType, DeviceType, NetworkPacket, Protocol, TcpFlag};
pub use generator::SyntheticTrafficGenerator;
pub use window::{TrafficWindow, WindowStatus};
