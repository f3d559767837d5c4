//! ARP (Address Resolution Protocol) message construction
//!
//! Construction and parsing only: transmission of ARP messages is left
//! to the caller's transport, matching the probe module's split between
//! building frames and moving them.

use crate::addr::{parse_ipv4, AddressError, LocalIdentity, MacAddr};
use byteorder::{BigEndian, ByteOrder};
use std::net::Ipv4Addr;

/// Serialized ARP message length for Ethernet/IPv4 in bytes
pub const ARP_LEN: usize = 28;

/// Hardware type code for Ethernet
const HARDWARE_TYPE_ETHERNET: u16 = 0x0001;
/// Protocol type code for IPv4
const PROTOCOL_TYPE_IPV4: u16 = 0x0800;
/// Hardware (MAC) address width
const HARDWARE_LEN: u8 = 6;
/// Protocol (IPv4) address width
const PROTOCOL_LEN: u8 = 4;

/// ARP operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOperation {
    Request = 1,
    Reply = 2,
}

impl ArpOperation {
    /// Map a wire code back to its operation, if recognized.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(ArpOperation::Request),
            2 => Some(ArpOperation::Reply),
            _ => None,
        }
    }
}

/// An ARP message for Ethernet/IPv4
///
/// The hardware/protocol type and address-length fields are fixed to the
/// widths of the address types carried (6 and 4) and are not
/// caller-configurable, so they cannot disagree with the addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage {
    pub operation: ArpOperation,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpMessage {
    /// Build a request resolving `target_ip_text`.
    ///
    /// Sender fields come from the local identity; the target MAC is the
    /// all-zero placeholder for the address being resolved. Codec
    /// failures on the target text propagate.
    pub fn request(identity: &LocalIdentity, target_ip_text: &str) -> Result<Self, AddressError> {
        Ok(ArpMessage {
            operation: ArpOperation::Request,
            sender_mac: identity.mac(),
            sender_ip: identity.ipv4(),
            target_mac: MacAddr::ZERO,
            target_ip: parse_ipv4(target_ip_text)?,
        })
    }

    /// Build the reply answering `request` with the resolved MAC.
    pub fn reply_to(request: &ArpMessage, resolved_mac: MacAddr) -> Self {
        ArpMessage {
            operation: ArpOperation::Reply,
            sender_mac: resolved_mac,
            sender_ip: request.target_ip,
            target_mac: request.sender_mac,
            target_ip: request.sender_ip,
        }
    }

    /// Serialize the message to its 28-byte wire form.
    pub fn to_bytes(&self) -> [u8; ARP_LEN] {
        let mut bytes = [0u8; ARP_LEN];
        BigEndian::write_u16(&mut bytes[0..2], HARDWARE_TYPE_ETHERNET);
        BigEndian::write_u16(&mut bytes[2..4], PROTOCOL_TYPE_IPV4);
        bytes[4] = HARDWARE_LEN;
        bytes[5] = PROTOCOL_LEN;
        BigEndian::write_u16(&mut bytes[6..8], self.operation as u16);
        bytes[8..14].copy_from_slice(&self.sender_mac.octets());
        bytes[14..18].copy_from_slice(&self.sender_ip.octets());
        bytes[18..24].copy_from_slice(&self.target_mac.octets());
        bytes[24..28].copy_from_slice(&self.target_ip.octets());
        bytes
    }

    /// Parse a message serialized by `to_bytes`.
    ///
    /// Returns None for short input, a pairing other than Ethernet/IPv4,
    /// address widths other than 6/4, or an unknown operation code.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < ARP_LEN {
            return None;
        }
        if BigEndian::read_u16(&data[0..2]) != HARDWARE_TYPE_ETHERNET
            || BigEndian::read_u16(&data[2..4]) != PROTOCOL_TYPE_IPV4
            || data[4] != HARDWARE_LEN
            || data[5] != PROTOCOL_LEN
        {
            return None;
        }

        let operation = ArpOperation::from_code(BigEndian::read_u16(&data[6..8]))?;
        let mut sender_mac = [0u8; 6];
        sender_mac.copy_from_slice(&data[8..14]);
        let mut target_mac = [0u8; 6];
        target_mac.copy_from_slice(&data[18..24]);

        Some(ArpMessage {
            operation,
            sender_mac: MacAddr(sender_mac),
            sender_ip: Ipv4Addr::new(data[14], data[15], data[16], data[17]),
            target_mac: MacAddr(target_mac),
            target_ip: Ipv4Addr::new(data[24], data[25], data[26], data[27]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> LocalIdentity {
        LocalIdentity::new("aabbccddeeff", "10.0.0.1").unwrap()
    }

    #[test]
    fn request_fields() {
        let msg = ArpMessage::request(&identity(), "10.0.0.2").unwrap();
        assert_eq!(msg.operation, ArpOperation::Request);
        assert_eq!(msg.sender_mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert_eq!(msg.sender_ip.octets(), [10, 0, 0, 1]);
        assert!(msg.target_mac.is_zero());
        assert_eq!(msg.target_ip.octets(), [10, 0, 0, 2]);
    }

    #[test]
    fn request_propagates_bad_target() {
        assert!(ArpMessage::request(&identity(), "::1").is_err());
        assert!(ArpMessage::request(&identity(), "10.0.0").is_err());
    }

    #[test]
    fn wire_layout() {
        let msg = ArpMessage::request(&identity(), "10.0.0.2").unwrap();
        let wire = msg.to_bytes();
        assert_eq!(&wire[0..2], &[0x00, 0x01]); // Ethernet
        assert_eq!(&wire[2..4], &[0x08, 0x00]); // IPv4
        assert_eq!(wire[4], 6);
        assert_eq!(wire[5], 4);
        assert_eq!(&wire[6..8], &[0x00, 0x01]); // request
        assert_eq!(&wire[8..14], &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert_eq!(&wire[14..18], &[10, 0, 0, 1]);
        assert_eq!(&wire[18..24], &[0u8; 6]);
        assert_eq!(&wire[24..28], &[10, 0, 0, 2]);
    }

    #[test]
    fn parse_round_trip() {
        let msg = ArpMessage::request(&identity(), "10.0.0.2").unwrap();
        let parsed = ArpMessage::from_bytes(&msg.to_bytes()).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn parse_rejects_unknown_operation() {
        let msg = ArpMessage::request(&identity(), "10.0.0.2").unwrap();
        let mut wire = msg.to_bytes();
        wire[7] = 9;
        assert!(ArpMessage::from_bytes(&wire).is_none());
    }

    #[test]
    fn parse_rejects_wrong_widths() {
        let msg = ArpMessage::request(&identity(), "10.0.0.2").unwrap();
        let mut wire = msg.to_bytes();
        wire[4] = 8; // not a MAC width
        assert!(ArpMessage::from_bytes(&wire).is_none());
    }

    #[test]
    fn reply_swaps_endpoints() {
        let request = ArpMessage::request(&identity(), "10.0.0.2").unwrap();
        let resolved = MacAddr::parse("112233445566").unwrap();
        let reply = ArpMessage::reply_to(&request, resolved);
        assert_eq!(reply.operation, ArpOperation::Reply);
        assert_eq!(reply.sender_mac, resolved);
        assert_eq!(reply.sender_ip, request.target_ip);
        assert_eq!(reply.target_mac, request.sender_mac);
        assert_eq!(reply.target_ip, request.sender_ip);
    }
}
