//! Network Packet - synthetic traffic record
//!
//! Plain data, no behaviour beyond a few flag helpers.

use std::net::Ipv4Addr;
use serde::{Deserialize, Serialize};

/// Transport protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
        }
    }
}

/// TCP control flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TcpFlag {
    Syn,
    Ack,
    Fin,
    Rst,
    Psh,
    Urg,
}

/// IoT device kinds seen in the synthetic traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    SmartCamera,
    SmartThermostat,
    SmartDoorbell,
    SmartLight,
    SmartSpeaker,
    SmartTv,
    SmartRefrigerator,
    SmartWatch,
    IndustrialSensor,
    MedicalDevice,
    SmartCar,
    Drone,
}

impl DeviceType {
    pub const ALL: [DeviceType; 12] = [
        DeviceType::SmartCamera,
        DeviceType::SmartThermostat,
        DeviceType::SmartDoorbell,
        DeviceType::SmartLight,
        DeviceType::SmartSpeaker,
        DeviceType::SmartTv,
        DeviceType::SmartRefrigerator,
        DeviceType::SmartWatch,
        DeviceType::IndustrialSensor,
        DeviceType::MedicalDevice,
        DeviceType::SmartCar,
        DeviceType::Drone,
    ];
}

/// Attack families (CICIoT2023 naming)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    #[serde(rename = "DDoS-SYN_Flood")]
    SynFlood,
    #[serde(rename = "DDoS-ACK_Fragmentation")]
    AckFragmentation,
    #[serde(rename = "Backdoor_Malware")]
    BackdoorMalware,
    #[serde(rename = "Recon-PortScan")]
    PortScan,
}

impl AttackType {
    pub const ALL: [AttackType; 4] = [
        AttackType::SynFlood,
        AttackType::AckFragmentation,
        AttackType::BackdoorMalware,
        AttackType::PortScan,
    ];
}

/// One observed (here: generated) packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPacket {
    /// Milliseconds since Unix epoch
    pub timestamp_ms: i64,
    pub source_ip: Ipv4Addr,
    pub dest_ip: Ipv4Addr,
    pub source_port: u16,
    pub dest_port: u16,
    pub protocol: Protocol,
    /// Bytes on the wire
    pub packet_size: u32,
    /// Empty for non-TCP packets
    pub flags: Vec<TcpFlag>,
    pub ttl: u8,
    /// 0 for non-TCP packets
    pub window_size: u16,
    pub device_type: DeviceType,
    pub is_attack: bool,
    pub attack_type: Option<AttackType>,
}

impl NetworkPacket {
    pub fn is_tcp(&self) -> bool {
        self.protocol == Protocol::Tcp
    }

    pub fn has_flag(&self, flag: TcpFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// TCP connection attempt without acknowledgement (half-open)
    pub fn is_bare_syn(&self) -> bool {
        self.is_tcp() && self.has_flag(TcpFlag::Syn) && !self.has_flag(TcpFlag::Ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp_packet(flags: Vec<TcpFlag>) -> NetworkPacket {
        NetworkPacket {
            timestamp_ms: 0,
            source_ip: Ipv4Addr::new(192, 168, 1, 10),
            dest_ip: Ipv4Addr::new(10, 0, 0, 1),
            source_port: 40000,
            dest_port: 443,
            protocol: Protocol::Tcp,
            packet_size: 60,
            flags,
            ttl: 64,
            window_size: 8192,
            device_type: DeviceType::SmartCamera,
            is_attack: false,
            attack_type: None,
        }
    }

    #[test]
    fn test_bare_syn() {
        assert!(tcp_packet(vec![TcpFlag::Syn]).is_bare_syn());
        assert!(!tcp_packet(vec![TcpFlag::Syn, TcpFlag::Ack]).is_bare_syn());
        assert!(!tcp_packet(vec![TcpFlag::Ack]).is_bare_syn());

        let mut udp = tcp_packet(vec![TcpFlag::Syn]);
        udp.protocol = Protocol::Udp;
        assert!(!udp.is_bare_syn());
    }

    #[test]
    fn test_packet_serialization_names() {
        let json = serde_json::to_value(tcp_packet(vec![TcpFlag::Psh])).unwrap();
        assert_eq!(json["protocol"], "TCP");
        assert_eq!(json["flags"][0], "PSH");
        assert_eq!(json["device_type"], "smart_camera");
        assert_eq!(json["source_ip"], "192.168.1.10");
    }
}
