//! Feature Extractor
//!
//! Turns the packets of a trailing time window into `ProcessedFeatures`.
//! Pure function of (packets, now); never fails, empty input gives zeros.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use serde::{Deserialize, Serialize};

use crate::constants::{self, DEFAULT_VOLUME_BASELINE_BPS, DEFAULT_WINDOW_SECS, MAX_WINDOW_SECS, VOLUME_ANOMALY_CAP};
use crate::logic::traffic::{DeviceType, NetworkPacket};
use super::processed::ProcessedFeatures;

/// Distinct destination ports that saturate the port-scan indicator
pub const PORT_SCAN_SATURATION: f64 = 100.0;

/// Packets from one device/source pair considered out of profile
pub const DEVICE_PACKET_LIMIT: usize = 100;

/// Mean packet size (bytes) considered out of profile for a device
pub const DEVICE_SIZE_LIMIT: f64 = 1400.0;

/// Score added per out-of-profile device/source pair
const DEVICE_ANOMALY_STEP: f64 = 0.1;

/// Window-based feature extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureExtractor {
    window_secs: u64,
    volume_baseline_bps: f64,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECS)
    }
}

impl FeatureExtractor {
    /// Window length is clamped to `1..=MAX_WINDOW_SECS`
    pub fn new(window_secs: u64) -> Self {
        Self {
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            volume_baseline_bps: DEFAULT_VOLUME_BASELINE_BPS,
        }
    }

    /// Override the bytes/sec considered normal
    pub fn with_volume_baseline(mut self, bytes_per_sec: f64) -> Self {
        if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
            self.volume_baseline_bps = bytes_per_sec;
        }
        self
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    pub fn window_ms(&self) -> i64 {
        constants::window_millis(self.window_secs)
    }

    /// Packets with `0 <= now - timestamp < window`
    pub fn in_window<'a>(&self, packets: &'a [NetworkPacket], now_ms: i64) -> Vec<&'a NetworkPacket> {
        let window_ms = self.window_ms();
        packets
            .iter()
            .filter(|p| {
                let age = now_ms - p.timestamp_ms;
                (0..window_ms).contains(&age)
            })
            .collect()
    }

    /// Summarize the packets of the trailing window ending at `now_ms`
    pub fn extract(&self, packets: &[NetworkPacket], now_ms: i64) -> ProcessedFeatures {
        let recent = self.in_window(packets, now_ms);
        let window_secs = self.window_secs as f64;

        let mut features = ProcessedFeatures {
            packet_count: recent.len(),
            packet_rate: recent.len() as f64 / window_secs,
            ..Default::default()
        };

        if recent.is_empty() {
            return features;
        }

        let total_bytes: u64 = recent.iter().map(|p| p.packet_size as u64).sum();
        features.avg_packet_size = total_bytes as f64 / recent.len() as f64;

        for packet in &recent {
            *features.protocol_distribution.entry(packet.protocol).or_insert(0) += 1;
            for flag in &packet.flags {
                *features.flag_frequency.entry(*flag).or_insert(0) += 1;
            }
        }

        features.entropy_score = source_entropy(&recent);
        features.port_scan_indicator = port_scan_indicator(&recent);
        features.syn_flood_indicator = syn_flood_indicator(&recent);
        features.volume_anomaly_score =
            ((total_bytes as f64 / window_secs) / self.volume_baseline_bps).min(VOLUME_ANOMALY_CAP);
        features.device_behavior_score = device_behavior_score(&recent);

        log::trace!(
            "Extracted window: {} packets, rate {:.2}/s, entropy {:.3}",
            features.packet_count,
            features.packet_rate,
            features.entropy_score
        );

        features
    }
}

// ============================================================================
// INDICATORS
// ============================================================================

/// Shannon entropy (base 2) of the source-IP distribution
pub fn source_entropy(packets: &[&NetworkPacket]) -> f64 {
    let mut frequency: HashMap<Ipv4Addr, usize> = HashMap::new();
    for packet in packets {
        *frequency.entry(packet.source_ip).or_insert(0) += 1;
    }
    shannon_entropy(frequency.values().copied(), packets.len())
}

/// Entropy of a count distribution; 0 for empty or single-valued input
pub fn shannon_entropy<I: IntoIterator<Item = usize>>(counts: I, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .into_iter()
        .filter(|c| *c > 0)
        .map(|c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// Largest destination-port fan-out of any one source, normalized to 0..=1
pub fn port_scan_indicator(packets: &[&NetworkPacket]) -> f64 {
    let mut ports: HashMap<Ipv4Addr, HashSet<u16>> = HashMap::new();
    for packet in packets {
        ports.entry(packet.source_ip).or_default().insert(packet.dest_port);
    }

    let max_ports = ports.values().map(|set| set.len()).max().unwrap_or(0);
    (max_ports as f64 / PORT_SCAN_SATURATION).min(1.0)
}

/// Bare-SYN share of TCP packets (0 without TCP)
pub fn syn_flood_indicator(packets: &[&NetworkPacket]) -> f64 {
    let tcp = packets.iter().filter(|p| p.is_tcp()).count();
    if tcp == 0 {
        return 0.0;
    }
    let bare_syn = packets.iter().filter(|p| p.is_bare_syn()).count();
    bare_syn as f64 / tcp as f64
}

/// Out-of-profile device/source pairs, 0.1 each, capped at 1
pub fn device_behavior_score(packets: &[&NetworkPacket]) -> f64 {
    // (packets, total bytes) per device/source pair
    let mut groups: HashMap<(DeviceType, Ipv4Addr), (usize, u64)> = HashMap::new();
    for packet in packets {
        let entry = groups.entry((packet.device_type, packet.source_ip)).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += packet.packet_size as u64;
    }

    let anomalous = groups
        .values()
        .filter(|(count, bytes)| {
            let mean_size = *bytes as f64 / *count as f64;
            *count > DEVICE_PACKET_LIMIT || mean_size > DEVICE_SIZE_LIMIT
        })
        .count();

    (anomalous as f64 * DEVICE_ANOMALY_STEP).min(1.0)
}
