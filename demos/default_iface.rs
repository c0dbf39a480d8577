//! Open a packet socket on the default Ethernet interface
//!
//! To run this example:
//!
//! ```sh
//! sudo cargo run --example default_iface
//! ```
//!
//! Note: `CAP_NET_RAW` is required to open the socket.

use packet_iface::InterfaceSocket;
use std::process::ExitCode;

fn main() -> ExitCode {
    match InterfaceSocket::new() {
        Ok(sock) => {
            println!("Interface: {}", sock.ifname());
            println!("Hardware address: {}", sock.hardware_address());
            println!("Socket fd: {}", sock.fd());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error occurred in {}: {}", e.step(), e);
            ExitCode::FAILURE
        }
    }
}
