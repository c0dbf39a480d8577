//! Socket layer
//!
//! - Raw `AF_PACKET` socket creation and the interface ioctls
//! - `InterfaceSocket`, the owned socket bound to the default interface

pub mod interface_socket;
pub mod raw;

pub use interface_socket::InterfaceSocket;
