//! Synthetic Traffic Generator
//!
//! Placeholder data source. Produces IoT-flavoured packets with attack
//! bursts so the pipeline can be exercised end to end. This is NOT captured
//! traffic; plug a real labelled dataset in front of the extractor for any
//! actual measurement.

use std::net::Ipv4Addr;
use rand::rngs::StdRng;
use rand::Rng;

use crate::constants;
use crate::logic::features::FeatureExtractor;
use crate::logic::model::TrainingData;
use crate::logic::threat::TrafficClass;
use super::packet::{AttackType, DeviceType, NetworkPacket, Protocol, TcpFlag};

/// Default share of attack packets in mixed traffic
pub const DEFAULT_ATTACK_RATIO: f64 = 0.12;

/// Servers targeted by attack traffic
const ATTACK_TARGETS: [Ipv4Addr; 3] = [
    Ipv4Addr::new(203, 0, 113, 1),
    Ipv4Addr::new(198, 51, 100, 1),
    Ipv4Addr::new(192, 0, 2, 1),
];

/// Service ports attackers aim at
const ATTACK_PORTS: [u16; 7] = [80, 443, 22, 21, 25, 53, 3389];

const TCP_WINDOW_SIZES: [u16; 4] = [8192, 16384, 32768, 65535];

const ATTACK_FLAG_PATTERNS: [&[TcpFlag]; 4] = [
    &[TcpFlag::Syn],
    &[TcpFlag::Syn, TcpFlag::Ack],
    &[TcpFlag::Fin, TcpFlag::Rst],
    &[TcpFlag::Psh, TcpFlag::Ack],
];

const NORMAL_FLAG_PATTERNS: [&[TcpFlag]; 6] = [
    &[TcpFlag::Syn],
    &[TcpFlag::Syn, TcpFlag::Ack],
    &[TcpFlag::Ack],
    &[TcpFlag::Psh, TcpFlag::Ack],
    &[TcpFlag::Fin, TcpFlag::Ack],
    &[TcpFlag::Rst],
];

/// Seedable generator of synthetic packets and labelled windows
pub struct SyntheticTrafficGenerator {
    rng: StdRng,
    attack_ratio: f64,
}

impl SyntheticTrafficGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: crate::logic::seeded_rng(seed),
            attack_ratio: DEFAULT_ATTACK_RATIO,
        }
    }

    /// Override the attack share (clamped to 0..=1)
    pub fn with_attack_ratio(mut self, ratio: f64) -> Self {
        self.attack_ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { DEFAULT_ATTACK_RATIO };
        self
    }

    pub fn attack_ratio(&self) -> f64 {
        self.attack_ratio
    }

    // ========================================================================
    // MIXED TRAFFIC
    // ========================================================================

    /// Mixed traffic stepping back from `now_ms`, newest first
    pub fn generate_packets(&mut self, count: usize, now_ms: i64) -> Vec<NetworkPacket> {
        let mut packets = Vec::with_capacity(count);
        let mut timestamp = now_ms;

        for _ in 0..count {
            let is_attack = self.rng.gen::<f64>() < self.attack_ratio;
            let packet = if is_attack {
                self.attack_packet(timestamp)
            } else {
                self.normal_packet(timestamp)
            };
            packets.push(packet);
            timestamp -= self.rng.gen_range(500..2500);
        }

        packets.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        log::debug!(
            "Generated {} synthetic packets ({} attack)",
            packets.len(),
            packets.iter().filter(|p| p.is_attack).count()
        );
        packets
    }

    // ========================================================================
    // LABELLED WINDOWS
    // ========================================================================

    /// One window of traffic shaped like `class`, all inside the trailing window
    pub fn generate_window(&mut self, class: TrafficClass, now_ms: i64, window_secs: u64) -> Vec<NetworkPacket> {
        let window_ms = constants::window_millis(window_secs);
        let mut packets = Vec::new();

        let background = match class {
            TrafficClass::Normal => self.rng.gen_range(20..60),
            _ => self.rng.gen_range(10..30),
        };
        for _ in 0..background {
            let ts = self.timestamp_in_window(now_ms, window_ms);
            packets.push(self.normal_packet(ts));
        }

        match class {
            TrafficClass::Normal => {}
            TrafficClass::Suspicious => self.push_port_scan(&mut packets, now_ms, window_ms),
            TrafficClass::Ddos => self.push_syn_flood(&mut packets, now_ms, window_ms),
        }

        packets.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        packets
    }

    /// Labelled windows, cycling Normal → Suspicious → DDoS
    pub fn generate_training_set(
        &mut self,
        windows: usize,
        now_ms: i64,
        extractor: &FeatureExtractor,
    ) -> Vec<TrainingData> {
        (0..windows)
            .map(|i| {
                let class = TrafficClass::ALL[i % TrafficClass::ALL.len()];
                let packets = self.generate_window(class, now_ms, extractor.window_secs());
                TrainingData::new(extractor.extract(&packets, now_ms), class)
            })
            .collect()
    }

    /// One scanner walking many destination ports of a single host
    fn push_port_scan(&mut self, packets: &mut Vec<NetworkPacket>, now_ms: i64, window_ms: i64) {
        let scanner = self.device_ip(DeviceType::SmartCamera);
        let target = self.pick(&ATTACK_TARGETS);
        let port_count: u16 = self.rng.gen_range(40..120);
        let first_port: u16 = self.rng.gen_range(1..10_000);

        for offset in 0..port_count {
            let ts = self.timestamp_in_window(now_ms, window_ms);
            packets.push(NetworkPacket {
                timestamp_ms: ts,
                source_ip: scanner,
                dest_ip: target,
                source_port: self.rng.gen_range(1024..=u16::MAX),
                dest_port: first_port + offset,
                protocol: Protocol::Tcp,
                packet_size: self.rng.gen_range(40..64),
                flags: vec![TcpFlag::Syn],
                ttl: self.rng.gen_range(50..70),
                window_size: 1024,
                device_type: DeviceType::SmartCamera,
                is_attack: true,
                attack_type: Some(AttackType::PortScan),
            });
        }
    }

    /// Many spoofed sources hammering one service with bare SYNs
    fn push_syn_flood(&mut self, packets: &mut Vec<NetworkPacket>, now_ms: i64, window_ms: i64) {
        let target = self.pick(&ATTACK_TARGETS);
        let dest_port = self.pick(&ATTACK_PORTS);
        let count = self.rng.gen_range(400..900);

        for _ in 0..count {
            let ts = self.timestamp_in_window(now_ms, window_ms);
            let device_type = self.pick(&DeviceType::ALL);
            packets.push(NetworkPacket {
                timestamp_ms: ts,
                source_ip: Ipv4Addr::new(
                    self.rng.gen_range(1..224),
                    self.rng.gen(),
                    self.rng.gen(),
                    self.rng.gen_range(1..255),
                ),
                dest_ip: target,
                source_port: self.rng.gen_range(1..=u16::MAX),
                dest_port,
                protocol: Protocol::Tcp,
                packet_size: if self.rng.gen_bool(0.5) { 1500 } else { self.rng.gen_range(28..92) },
                flags: vec![TcpFlag::Syn],
                ttl: self.rng.gen_range(30..128),
                window_size: self.pick(&TCP_WINDOW_SIZES),
                device_type,
                is_attack: true,
                attack_type: Some(AttackType::SynFlood),
            });
        }
    }

    // ========================================================================
    // PACKET BUILDERS
    // ========================================================================

    fn normal_packet(&mut self, timestamp_ms: i64) -> NetworkPacket {
        let device_type = self.pick(&DeviceType::ALL);
        let protocol = self.normal_protocol(device_type);
        let (source_port, dest_port) = self.normal_ports(device_type);

        NetworkPacket {
            timestamp_ms,
            source_ip: self.device_ip(device_type),
            dest_ip: Ipv4Addr::new(10, 0, self.rng.gen_range(0..255), self.rng.gen_range(0..255)),
            source_port,
            dest_port,
            protocol,
            packet_size: self.normal_size(device_type),
            flags: self.flags_for(protocol, &NORMAL_FLAG_PATTERNS),
            ttl: self.device_ttl(device_type),
            window_size: self.window_size_for(protocol),
            device_type,
            is_attack: false,
            attack_type: None,
        }
    }

    fn attack_packet(&mut self, timestamp_ms: i64) -> NetworkPacket {
        let device_type = self.pick(&DeviceType::ALL);
        let protocol = self.pick(&[Protocol::Tcp, Protocol::Udp, Protocol::Icmp]);

        NetworkPacket {
            timestamp_ms,
            source_ip: self.device_ip(device_type),
            dest_ip: self.pick(&ATTACK_TARGETS),
            source_port: self.rng.gen_range(1..=u16::MAX),
            dest_port: self.pick(&ATTACK_PORTS),
            protocol,
            packet_size: if self.rng.gen_bool(0.5) { 1500 } else { self.rng.gen_range(28..92) },
            flags: self.flags_for(protocol, &ATTACK_FLAG_PATTERNS),
            ttl: self.device_ttl(device_type),
            window_size: self.window_size_for(protocol),
            device_type,
            is_attack: true,
            attack_type: Some(self.pick(&AttackType::ALL)),
        }
    }

    fn device_ip(&mut self, device_type: DeviceType) -> Ipv4Addr {
        let [a, b, c] = match device_type {
            DeviceType::SmartCamera => [192, 168, 1],
            DeviceType::SmartThermostat => [192, 168, 2],
            DeviceType::IndustrialSensor => [10, 0, 1],
            DeviceType::MedicalDevice => [172, 16, 1],
            _ => [192, 168, 0],
        };
        Ipv4Addr::new(a, b, c, self.rng.gen_range(1..=254))
    }

    fn normal_protocol(&mut self, device_type: DeviceType) -> Protocol {
        match device_type {
            DeviceType::SmartThermostat | DeviceType::MedicalDevice => Protocol::Tcp,
            DeviceType::IndustrialSensor => self.pick(&[Protocol::Udp, Protocol::Tcp]),
            _ => self.pick(&[Protocol::Tcp, Protocol::Udp]),
        }
    }

    fn normal_ports(&mut self, device_type: DeviceType) -> (u16, u16) {
        match device_type {
            DeviceType::SmartCamera => (8080, 554),
            DeviceType::SmartThermostat => (8443, 443),
            DeviceType::IndustrialSensor => (502, 502),
            DeviceType::MedicalDevice => (2575, 443),
            _ => (self.rng.gen_range(1024..=u16::MAX), 443),
        }
    }

    fn normal_size(&mut self, device_type: DeviceType) -> u32 {
        match device_type {
            DeviceType::SmartCamera => self.rng.gen_range(100..1500),
            DeviceType::SmartThermostat => self.rng.gen_range(50..250),
            DeviceType::IndustrialSensor => self.rng.gen_range(40..140),
            DeviceType::MedicalDevice => self.rng.gen_range(100..600),
            _ => self.rng.gen_range(64..1564),
        }
    }

    fn device_ttl(&mut self, device_type: DeviceType) -> u8 {
        match device_type {
            DeviceType::SmartCamera => self.rng.gen_range(60..70),
            DeviceType::IndustrialSensor => self.rng.gen_range(62..67),
            DeviceType::MedicalDevice => self.rng.gen_range(58..66),
            _ => self.rng.gen_range(50..70),
        }
    }

    fn flags_for(&mut self, protocol: Protocol, patterns: &[&[TcpFlag]]) -> Vec<TcpFlag> {
        if protocol != Protocol::Tcp {
            return Vec::new();
        }
        self.pick(patterns).to_vec()
    }

    fn window_size_for(&mut self, protocol: Protocol) -> u16 {
        if protocol == Protocol::Tcp {
            self.pick(&TCP_WINDOW_SIZES)
        } else {
            0
        }
    }

    fn timestamp_in_window(&mut self, now_ms: i64, window_ms: i64) -> i64 {
        now_ms - self.rng.gen_range(0..window_ms)
    }

    /// Uniform pick from a non-empty constant table
    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.gen_range(0..items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a = SyntheticTrafficGenerator::new(Some(7)).generate_packets(200, NOW);
        let b = SyntheticTrafficGenerator::new(Some(7)).generate_packets(200, NOW);
        assert_eq!(a, b);
    }

    #[test]
    fn test_packets_sorted_newest_first() {
        let packets = SyntheticTrafficGenerator::new(Some(1)).generate_packets(100, NOW);
        assert_eq!(packets.len(), 100);
        assert_eq!(packets[0].timestamp_ms, NOW);
        assert!(packets.windows(2).all(|w| w[0].timestamp_ms >= w[1].timestamp_ms));
    }

    #[test]
    fn test_flags_only_on_tcp() {
        let packets = SyntheticTrafficGenerator::new(Some(3)).generate_packets(500, NOW);
        for p in &packets {
            if p.protocol != Protocol::Tcp {
                assert!(p.flags.is_empty());
                assert_eq!(p.window_size, 0);
            } else {
                assert!(!p.flags.is_empty());
            }
            assert_eq!(p.is_attack, p.attack_type.is_some());
        }
    }

    #[test]
    fn test_attack_ratio_extremes() {
        let all_attack = SyntheticTrafficGenerator::new(Some(5))
            .with_attack_ratio(1.0)
            .generate_packets(50, NOW);
        assert!(all_attack.iter().all(|p| p.is_attack));

        let no_attack = SyntheticTrafficGenerator::new(Some(5))
            .with_attack_ratio(0.0)
            .generate_packets(50, NOW);
        assert!(no_attack.iter().all(|p| !p.is_attack));
    }

    #[test]
    fn test_windows_stay_inside_window() {
        let mut gen = SyntheticTrafficGenerator::new(Some(11));
        for class in TrafficClass::ALL {
            let packets = gen.generate_window(class, NOW, 60);
            assert!(!packets.is_empty());
            assert!(packets.iter().all(|p| p.timestamp_ms <= NOW && NOW - p.timestamp_ms < 60_000));
        }
    }

    #[test]
    fn test_training_set_cycles_classes() {
        let extractor = FeatureExtractor::default();
        let data = SyntheticTrafficGenerator::new(Some(2)).generate_training_set(6, NOW, &extractor);

        let labels: Vec<_> = data.iter().map(|d| d.label).collect();
        assert_eq!(labels[0], TrafficClass::Normal);
        assert_eq!(labels[1], TrafficClass::Suspicious);
        assert_eq!(labels[2], TrafficClass::Ddos);
        assert_eq!(labels[3], TrafficClass::Normal);
        assert!(data[2].features.packet_count > data[0].features.packet_count);
    }
}
