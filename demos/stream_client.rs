//! Length-prefixed stream protocol client example
//!
//! Connects to the stream server, sends one Data frame, prints the
//! acknowledgment, then requests termination.
//!
//! To run this example (with `stream_server` already running):
//!
//! ```sh
//! cargo run --example stream_client
//! ```

use etherping::stream::{send_request, send_terminate};
use std::net::TcpStream;

fn main() -> std::io::Result<()> {
    let mut stream = TcpStream::connect("127.0.0.1:9000")?;

    match send_request(&mut stream, b"Hello, Server!") {
        Ok(ack) => println!(
            "Received response: Version={}, Data={}",
            ack.version,
            String::from_utf8_lossy(&ack.payload)
        ),
        Err(e) => {
            eprintln!("Request failed: {}", e);
            return Ok(());
        }
    }

    if let Err(e) = send_terminate(&mut stream) {
        eprintln!("Termination request failed: {}", e);
    }

    Ok(())
}
