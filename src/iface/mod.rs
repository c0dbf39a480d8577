//! Network interface discovery
//!
//! This module finds the interface a packet tool should default to:
//! - Interface records, flags and hardware addresses
//! - The query seam to the host
//! - Listing retrieval and candidate selection

pub mod control;
pub mod discovery;
pub mod interface;

// Re-export commonly used items
pub use control::InterfaceControl;
pub use discovery::{is_ethernet_name, list_interfaces, select_interface};
pub use interface::{HardwareAddress, InterfaceFlags, InterfaceListing, InterfaceRecord};
