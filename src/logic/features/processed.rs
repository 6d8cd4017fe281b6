//! Processed Features - per-window traffic summary

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::logic::traffic::{Protocol, TcpFlag};

/// Summary of the packets seen in one trailing window
///
/// Immutable once computed; every classifier projects it into its own
/// feature vector (see `layout.rs`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFeatures {
    /// Packets per second over the window
    pub packet_rate: f64,
    /// Mean packet size in bytes
    pub avg_packet_size: f64,
    pub protocol_distribution: BTreeMap<Protocol, u64>,
    pub flag_frequency: BTreeMap<TcpFlag, u64>,
    /// Shannon entropy (bits) of source IPs
    pub entropy_score: f64,
    /// Widest destination-port fan-out of one source, /100, capped at 1
    pub port_scan_indicator: f64,
    /// Share of TCP packets that are bare SYNs
    pub syn_flood_indicator: f64,
    /// Bytes/sec over the volume baseline, capped at 5
    pub volume_anomaly_score: f64,
    /// Share of device/source pairs behaving out of profile, capped at 1
    pub device_behavior_score: f64,
    /// Packets that fell inside the window
    pub packet_count: usize,
}

impl ProcessedFeatures {
    /// Number of distinct protocols seen
    pub fn protocol_diversity(&self) -> usize {
        self.protocol_distribution.len()
    }

    /// Number of distinct TCP flags seen
    pub fn flag_diversity(&self) -> usize {
        self.flag_frequency.len()
    }

    /// Share of packets carried by the most used protocol (0 when empty)
    ///
    /// Divided by the packet count, not the packet rate, so the value stays
    /// in 0..=1 whatever the window length.
    pub fn dominant_protocol_share(&self) -> f64 {
        if self.packet_count == 0 {
            return 0.0;
        }
        let dominant = self.protocol_distribution.values().copied().max().unwrap_or(0);
        dominant as f64 / self.packet_count as f64
    }

    /// True when every numeric field is finite
    pub fn is_finite(&self) -> bool {
        [
            self.packet_rate,
            self.avg_packet_size,
            self.entropy_score,
            self.port_scan_indicator,
            self.syn_flood_indicator,
            self.volume_anomaly_score,
            self.device_behavior_score,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
