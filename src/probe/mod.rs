//! Echo exchange coordination
//!
//! One `ping` call is exactly one send and one deadline-bounded receive
//! over a caller-owned transport: build the request, write it, wait for
//! the matching reply, report round-trip time or a typed failure. Retry
//! and backoff policy stays with the caller.

pub mod transport;

// Re-export commonly used items
pub use transport::EchoTransport;

use crate::network::icmp::IcmpEcho;
use std::error::Error;
use std::fmt;
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Room for the largest reply this library's own requests can provoke.
const REPLY_BUF_LEN: usize = 1504;

/// A completed echo exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReply {
    /// Address the reply came from.
    pub peer: IpAddr,
    /// Elapsed time from send to receive.
    pub rtt: Duration,
    pub identifier: u16,
    pub sequence: u16,
}

/// Failure of one echo exchange
///
/// `TimedOut` and `MismatchedReply` are expected outcomes on an
/// unreliable transport, not fatal conditions; callers may simply call
/// again.
#[derive(Debug)]
pub enum PingError {
    /// The transport failed to accept the request.
    Send(io::Error),
    /// The transport accepted fewer bytes than the serialized request.
    ShortSend { written: usize, expected: usize },
    /// The transport failed while waiting for the reply.
    Recv(io::Error),
    /// No reply arrived before the deadline.
    TimedOut,
    /// Received bytes do not parse as an echo reply.
    MalformedReply,
    /// A reply arrived whose identifier/sequence does not correlate to
    /// the request just sent.
    MismatchedReply { identifier: u16, sequence: u16 },
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PingError::Send(e) => write!(f, "send failed: {}", e),
            PingError::ShortSend { written, expected } => {
                write!(f, "short send: {} of {} bytes", written, expected)
            }
            PingError::Recv(e) => write!(f, "receive failed: {}", e),
            PingError::TimedOut => write!(f, "no reply within deadline"),
            PingError::MalformedReply => write!(f, "reply did not parse as an echo reply"),
            PingError::MismatchedReply {
                identifier,
                sequence,
            } => write!(
                f,
                "reply id {}/seq {} does not match the request",
                identifier, sequence
            ),
        }
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PingError::Send(e) | PingError::Recv(e) => Some(e),
            _ => None,
        }
    }
}

impl PingError {
    /// True for the recoverable no-reply outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PingError::TimedOut)
    }
}

/// Perform one timed echo exchange.
///
/// Builds an echo request from the caller-supplied identifier, sequence
/// and payload, writes it to `transport`, then waits for a matching
/// reply. The deadline is armed from the moment the send completes, not
/// from call entry, and the reported round-trip time spans send to
/// receive.
///
/// A reply whose identifier/sequence does not match is reported as
/// `MismatchedReply` without re-entering the receive; the caller owns
/// the decision to keep listening within whatever deadline remains.
pub fn ping<T: EchoTransport>(
    mut transport: T,
    timeout: Duration,
    identifier: u16,
    sequence: u16,
    payload: &[u8],
) -> Result<EchoReply, PingError> {
    let request = IcmpEcho::echo_request(identifier, sequence, payload);
    let request_bytes = request.to_bytes();

    let written = transport.send(&request_bytes).map_err(PingError::Send)?;
    if written != request_bytes.len() {
        return Err(PingError::ShortSend {
            written,
            expected: request_bytes.len(),
        });
    }

    let sent_at = Instant::now();
    let deadline = sent_at + timeout;

    let mut buf = [0u8; REPLY_BUF_LEN];
    let (nbytes, peer) = match transport.recv_deadline(&mut buf, deadline) {
        Ok(received) => received,
        Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => {
            return Err(PingError::TimedOut)
        }
        Err(e) => return Err(PingError::Recv(e)),
    };
    let rtt = sent_at.elapsed();

    let reply = IcmpEcho::from_bytes(&buf[..nbytes]).ok_or(PingError::MalformedReply)?;
    if !reply.is_echo_reply() || reply.msg_code != 0 {
        return Err(PingError::MalformedReply);
    }
    if reply.identifier != identifier || reply.sequence != sequence {
        return Err(PingError::MismatchedReply {
            identifier: reply.identifier,
            sequence: reply.sequence,
        });
    }

    Ok(EchoReply {
        peer,
        rtt,
        identifier: reply.identifier,
        sequence: reply.sequence,
    })
}
