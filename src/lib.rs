//! A raw link-layer packet socket for the default Ethernet interface
//!
//! This library opens an `AF_PACKET` socket and picks an interface for it
//! without any configuration:
//! - Interface listing through `SIOCGIFCONF`
//! - Filtering on flags, hardware family and name
//! - Owned descriptor released on drop

pub mod error;
pub mod iface;
pub mod socket;

// Re-export commonly used types
pub use error::{Error, ErrorCode, Result};
pub use iface::{is_ethernet_name, HardwareAddress, InterfaceControl, InterfaceFlags, InterfaceRecord};
pub use socket::InterfaceSocket;
