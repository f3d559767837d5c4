//! A simple raw-frame construction and echo probing library in Rust
//!
//! This library provides low-level network plumbing including:
//! - Ethernet and ARP frame construction
//! - ICMP echo request/reply handling with Internet checksums
//! - Timed echo exchanges over an injected transport
//! - A length-prefixed stream protocol for framed request/response

pub mod addr;
pub mod link;
pub mod network;
pub mod probe;
pub mod stream;

// Re-export commonly used types
pub use addr::{AddressError, LocalIdentity, MacAddr};
pub use link::{ArpMessage, ArpOperation, EtherType, EthernetFrame, FrameError};
pub use network::icmp::{IcmpEcho, ICMP_TYPE_ECHO_REPLY, ICMP_TYPE_ECHO_REQUEST};
pub use probe::{ping, EchoReply, EchoTransport, PingError};
pub use stream::{OpCode, StreamError, StreamFrame};
