//! Length-prefixed stream protocol server example
//!
//! Listens on TCP port 9000 and spawns one handler thread per
//! connection; each handler acknowledges Data frames and closes on a
//! termination request.
//!
//! To run this example:
//!
//! ```sh
//! cargo run --example stream_server
//! ```

use etherping::stream::handle_connection;
use std::net::TcpListener;
use std::thread;

fn main() -> std::io::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:9000")?;
    println!("Server is listening on port 9000...");

    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("Error accepting connection: {}", e);
                continue;
            }
        };

        thread::spawn(move || {
            let peer = stream
                .peer_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            println!("Connection from {}", peer);
            if let Err(e) = handle_connection(&mut stream) {
                eprintln!("Handler for {} failed: {}", peer, e);
            } else {
                println!("Connection from {} closed", peer);
            }
        });
    }

    Ok(())
}
