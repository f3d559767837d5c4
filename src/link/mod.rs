//! Link layer frame builders
//!
//! This module contains implementations for link layer framing:
//! - Ethernet: toy frame with preamble, addresses, EtherType and payload
//! - ARP: request/reply message construction

pub mod arp;
pub mod ethernet;

// Re-export commonly used items
pub use arp::{ArpMessage, ArpOperation};
pub use ethernet::{EtherType, EthernetFrame, PREAMBLE};

use crate::addr::AddressError;
use std::error::Error;
use std::fmt;

/// Construction-time frame errors
///
/// Fail fast: when a builder returns one of these, no partially built
/// structure exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The EtherType name is not one of the recognized symbolic names.
    UnsupportedEtherType(String),
    /// An address field failed to decode.
    Address(AddressError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::UnsupportedEtherType(name) => {
                write!(f, "unsupported EtherType: {}", name)
            }
            FrameError::Address(e) => write!(f, "{}", e),
        }
    }
}

impl Error for FrameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FrameError::Address(e) => Some(e),
            FrameError::UnsupportedEtherType(_) => None,
        }
    }
}

impl From<AddressError> for FrameError {
    fn from(e: AddressError) -> Self {
        FrameError::Address(e)
    }
}
