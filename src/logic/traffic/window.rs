//! Traffic Window - sliding packet buffer feeding the extractor
//!
//! Bounded, thread-safe buffer of recent packets.

use std::collections::VecDeque;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants;
use super::packet::NetworkPacket;

/// Sliding buffer of recent packets
pub struct TrafficWindow {
    packets: RwLock<VecDeque<NetworkPacket>>,
    window_ms: i64,
    capacity: usize,
}

impl TrafficWindow {
    pub fn new(window_secs: u64, capacity: usize) -> Self {
        Self {
            packets: RwLock::new(VecDeque::new()),
            window_ms: constants::window_millis(window_secs),
            capacity: capacity.max(1),
        }
    }

    /// Push one packet, dropping the oldest when full
    pub fn push(&self, packet: NetworkPacket) {
        let mut buffer = self.packets.write();
        buffer.push_back(packet);

        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
    }

    /// Push many packets
    pub fn extend<I: IntoIterator<Item = NetworkPacket>>(&self, packets: I) {
        let mut buffer = self.packets.write();
        buffer.extend(packets);

        let overflow = buffer.len().saturating_sub(self.capacity);
        buffer.drain(..overflow);
    }

    /// Drop packets that fell out of the trailing window
    pub fn evict_older_than(&self, now_ms: i64) -> usize {
        let cutoff = now_ms.saturating_sub(self.window_ms);
        let mut buffer = self.packets.write();
        let before = buffer.len();
        buffer.retain(|p| p.timestamp_ms > cutoff);
        before - buffer.len()
    }

    /// Copy of the buffered packets
    pub fn snapshot(&self) -> Vec<NetworkPacket> {
        self.packets.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.packets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.read().is_empty()
    }

    pub fn clear(&self) {
        self.packets.write().clear();
    }

    pub fn status(&self) -> WindowStatus {
        let buffer = self.packets.read();
        WindowStatus {
            current_size: buffer.len(),
            capacity: self.capacity,
            window_secs: (self.window_ms / 1000) as u64,
            fill_percent: (buffer.len() as f32 / self.capacity as f32 * 100.0).min(100.0),
        }
    }
}

/// Buffer status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub window_secs: u64,
    pub fill_percent: f32,
}
