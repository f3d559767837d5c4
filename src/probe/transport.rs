//! Raw/ICMP transport abstraction
//!
//! The echo coordinator does not open sockets itself; it accepts any
//! transport implementing `EchoTransport`. Release of the underlying
//! handle is Drop, so it happens on every exit path once the owning
//! scope ends, error paths included.

use std::io;
use std::net::{IpAddr, UdpSocket};
use std::time::Instant;

/// A datagram transport carrying serialized ICMP messages.
///
/// Implementations deliver whole messages: one `send` per request, one
/// `recv_deadline` per reply, with the received buffer starting at the
/// ICMP header. Deadline expiry is reported as an `io::Error` of kind
/// `WouldBlock` or `TimedOut`.
///
/// A transport is owned exclusively by one exchange at a time; the
/// `&mut self` receivers make sharing a compile error rather than a
/// race.
pub trait EchoTransport {
    /// Write one serialized message, returning the byte count written.
    fn send(&mut self, message: &[u8]) -> io::Result<usize>;

    /// Block for one incoming message until `deadline`. Returns the
    /// byte count and the peer the message came from.
    fn recv_deadline(&mut self, buf: &mut [u8], deadline: Instant) -> io::Result<(usize, IpAddr)>;
}

impl<T: EchoTransport + ?Sized> EchoTransport for &mut T {
    fn send(&mut self, message: &[u8]) -> io::Result<usize> {
        (**self).send(message)
    }

    fn recv_deadline(&mut self, buf: &mut [u8], deadline: Instant) -> io::Result<(usize, IpAddr)> {
        (**self).recv_deadline(buf, deadline)
    }
}

/// `EchoTransport` over a connected `std::net::UdpSocket`.
///
/// Carries ICMP message bytes as UDP payload, which keeps the exchange
/// runnable on loopback without raw-socket privileges. The deadline is
/// realized with `set_read_timeout`.
impl EchoTransport for UdpSocket {
    fn send(&mut self, message: &[u8]) -> io::Result<usize> {
        UdpSocket::send(self, message)
    }

    fn recv_deadline(&mut self, buf: &mut [u8], deadline: Instant) -> io::Result<(usize, IpAddr)> {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
            .ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "receive deadline elapsed"))?;
        self.set_read_timeout(Some(remaining))?;
        let (nbytes, peer) = self.recv_from(buf)?;
        Ok((nbytes, peer.ip()))
    }
}
