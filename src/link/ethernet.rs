//! Ethernet frame construction
//!
//! This module provides a toy Ethernet framing: the start-of-frame
//! preamble is laid down in the serialized form, addresses are
//! fixed-width 6-byte values, and the payload protocol is identified by
//! a closed EtherType enumeration.

use crate::addr::MacAddr;
use crate::link::FrameError;
use byteorder::{BigEndian, ByteOrder};

/// Start-of-frame marker written ahead of every frame. Not
/// caller-configurable.
pub const PREAMBLE: [u8; 7] = [0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAB];

/// Preamble plus both addresses plus the EtherType field.
const FRAME_MIN_LEN: usize = PREAMBLE.len() + 6 + 6 + 2;

/// Payload protocol identifiers carried in the 2-byte EtherType field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtherType {
    Ipv4,
    Ipv6,
    Arp,
    AppleTalk,
    Ieee8021q,
}

impl EtherType {
    /// The 2-byte wire code for this EtherType.
    pub fn code(&self) -> u16 {
        match self {
            EtherType::Ipv4 => 0x0800,
            EtherType::Arp => 0x0806,
            EtherType::AppleTalk => 0x809B,
            EtherType::Ieee8021q => 0x8100,
            EtherType::Ipv6 => 0x86DD,
        }
    }

    /// Look up an EtherType by symbolic name.
    ///
    /// Recognizes "IPv4", "IPv6" and "ARP"; anything else fails with
    /// `FrameError::UnsupportedEtherType`.
    pub fn from_name(name: &str) -> Result<Self, FrameError> {
        match name {
            "IPv4" => Ok(EtherType::Ipv4),
            "IPv6" => Ok(EtherType::Ipv6),
            "ARP" => Ok(EtherType::Arp),
            _ => Err(FrameError::UnsupportedEtherType(name.to_string())),
        }
    }

    /// Map a wire code back to its EtherType, if recognized.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0800 => Some(EtherType::Ipv4),
            0x0806 => Some(EtherType::Arp),
            0x809B => Some(EtherType::AppleTalk),
            0x8100 => Some(EtherType::Ieee8021q),
            0x86DD => Some(EtherType::Ipv6),
            _ => None,
        }
    }
}

/// A toy Ethernet frame
///
/// MAC fields are fixed-width by construction; an unrecognized EtherType
/// cannot be represented, so the invariants of the wire form are
/// structural rather than checked at use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub dst_mac: MacAddr,
    pub src_mac: MacAddr,
    pub ether_type: EtherType,
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    /// Build a frame from already-decoded parts.
    pub fn new(dst_mac: MacAddr, src_mac: MacAddr, ether_type: EtherType, payload: Vec<u8>) -> Self {
        EthernetFrame {
            dst_mac,
            src_mac,
            ether_type,
            payload,
        }
    }

    /// Build a frame from address text and a symbolic EtherType name,
    /// propagating codec failures.
    pub fn from_text(
        dst_mac: &str,
        src_mac: &str,
        ether_type_name: &str,
        payload: Vec<u8>,
    ) -> Result<Self, FrameError> {
        Ok(EthernetFrame {
            dst_mac: MacAddr::parse(dst_mac)?,
            src_mac: MacAddr::parse(src_mac)?,
            ether_type: EtherType::from_name(ether_type_name)?,
            payload,
        })
    }

    /// Serialize the frame, preamble first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FRAME_MIN_LEN + self.payload.len());
        bytes.extend_from_slice(&PREAMBLE);
        bytes.extend_from_slice(&self.dst_mac.octets());
        bytes.extend_from_slice(&self.src_mac.octets());
        bytes.extend_from_slice(&self.ether_type.code().to_be_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Parse a frame serialized by `to_bytes`.
    ///
    /// Returns None when the preamble marker is absent, the data is too
    /// short, or the EtherType code is unrecognized.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < FRAME_MIN_LEN || data[..PREAMBLE.len()] != PREAMBLE {
            return None;
        }

        let mut dst = [0u8; 6];
        dst.copy_from_slice(&data[7..13]);
        let mut src = [0u8; 6];
        src.copy_from_slice(&data[13..19]);
        let ether_type = EtherType::from_code(BigEndian::read_u16(&data[19..21]))?;

        Some(EthernetFrame {
            dst_mac: MacAddr(dst),
            src_mac: MacAddr(src),
            ether_type,
            payload: data[FRAME_MIN_LEN..].to_vec(),
        })
    }
}
