//! A TUN interface echo responder example
//!
//! Answers ICMP echo requests arriving on a TUN device: the ICMP side
//! goes through this library's echo codec, the enclosing IPv4 header is
//! fixed up in place (addresses swapped, TTL reset, checksum refreshed).
//!
//! To run this example:
//!
//! ```sh
//! cargo run --example icmp_responder
//! ```
//!
//! Note: Root/sudo privileges are required to create and configure the
//! TUN device. Once running, `ping 10.0.0.1` from the host exercises it.

use etherping::network::checksum;
use etherping::IcmpEcho;
use std::io;
use std::process::Command;
use tun_tap::{Iface, Mode};

/// Assign an address to the interface and bring it up.
fn configure_interface(iface_name: &str, ip_cidr: &str) -> io::Result<()> {
    let status = Command::new("ip")
        .args(["addr", "add", ip_cidr, "dev", iface_name])
        .status()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("failed to assign {} to {}", ip_cidr, iface_name),
        ));
    }

    let status = Command::new("ip")
        .args(["link", "set", "up", "dev", iface_name])
        .status()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("failed to bring up {}", iface_name),
        ));
    }

    println!("Interface {} configured with {}", iface_name, ip_cidr);
    Ok(())
}

/// Build the reply packet for an IPv4 echo request, or None when the
/// packet is not one.
fn echo_reply_packet(packet: &[u8]) -> Option<Vec<u8>> {
    if packet.len() < 20 || (packet[0] >> 4) != 4 {
        return None;
    }
    let header_len = ((packet[0] & 0x0F) as usize) * 4;
    if header_len < 20 || packet.len() < header_len {
        return None;
    }
    if packet[9] != 1 {
        // Not ICMP
        return None;
    }

    let request = IcmpEcho::from_bytes(&packet[header_len..])?;
    if !request.is_echo_request() {
        return None;
    }
    let reply = IcmpEcho::echo_reply_to(&request);

    let mut response = packet[..header_len].to_vec();
    // Swap source and destination addresses
    response[12..16].copy_from_slice(&packet[16..20]);
    response[16..20].copy_from_slice(&packet[12..16]);
    // Reset TTL
    response[8] = 64;
    // Refresh the IP header checksum over the zeroed field
    response[10..12].copy_from_slice(&[0, 0]);
    let ip_sum = checksum(&response[..header_len]);
    response[10..12].copy_from_slice(&ip_sum.to_be_bytes());

    response.extend_from_slice(&reply.to_bytes());
    Some(response)
}

fn main() -> io::Result<()> {
    println!("Starting ICMP echo responder...");

    let iface = Iface::without_packet_info("tun0", Mode::Tun)?;
    configure_interface(iface.name(), "10.0.0.254/24")?;

    let mut buf = [0u8; 1504];
    loop {
        let nbytes = iface.recv(&mut buf)?;
        let packet = &buf[..nbytes];

        if let Some(response) = echo_reply_packet(packet) {
            match iface.send(&response) {
                Ok(_) => println!("Echoed {} bytes", response.len()),
                Err(e) => eprintln!("Failed to send reply: {}", e),
            }
        }
    }
}
