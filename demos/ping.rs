//! A loopback echo probe example
//!
//! Spawns a UDP responder thread that answers echo requests, then runs
//! timed pings against it and prints each round-trip time.
//!
//! To run this example:
//!
//! ```sh
//! cargo run --example ping
//! ```
//!
//! The exchange carries ICMP message bytes as UDP payload, so no
//! raw-socket privileges are needed.

use etherping::probe::ping;
use etherping::IcmpEcho;
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

fn main() -> std::io::Result<()> {
    // Responder: rewrite each request into a reply and send it back.
    let responder = UdpSocket::bind("127.0.0.1:0")?;
    let responder_addr = responder.local_addr()?;
    thread::spawn(move || {
        let mut buf = [0u8; 1504];
        loop {
            let (nbytes, from) = match responder.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) => {
                    eprintln!("Responder receive failed: {}", e);
                    return;
                }
            };
            let request = match IcmpEcho::from_bytes(&buf[..nbytes]) {
                Some(msg) if msg.is_echo_request() => msg,
                _ => {
                    println!("Ignoring non-request datagram ({} bytes)", nbytes);
                    continue;
                }
            };
            let reply = IcmpEcho::echo_reply_to(&request);
            if let Err(e) = responder.send_to(&reply.to_bytes(), from) {
                eprintln!("Responder send failed: {}", e);
                return;
            }
        }
    });

    println!("Probing {} ...", responder_addr);
    let mut socket = UdpSocket::bind("127.0.0.1:0")?;
    socket.connect(responder_addr)?;

    for sequence in 1..=4u16 {
        match ping(
            &mut socket,
            Duration::from_secs(1),
            0x1234,
            sequence,
            b"ping",
        ) {
            Ok(reply) => println!(
                "Reply from {}: seq={} time={:?}",
                reply.peer, reply.sequence, reply.rtt
            ),
            Err(e) => eprintln!("Probe seq={} failed: {}", sequence, e),
        }
    }

    Ok(())
}
