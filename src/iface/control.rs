//! Interface queries issued against an open socket
//!
//! Discovery only talks to the host through this trait, so the selection
//! logic can run over an in-memory host in tests.

use crate::iface::interface::{HardwareAddress, InterfaceFlags};
use std::ffi::OsStr;
use std::io;

pub trait InterfaceControl {
    /// `SIOCGIFCONF`
    ///
    /// With an empty `buf` nothing is written and the total byte length
    /// needed for the full listing is returned. Otherwise the buffer is
    /// filled with whole records and the number of bytes written is returned.
    fn interface_config(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// `SIOCGIFFLAGS` for the named interface
    fn interface_flags(&self, name: &OsStr) -> io::Result<InterfaceFlags>;

    /// `SIOCGIFHWADDR` for the named interface
    fn hardware_address(&self, name: &OsStr) -> io::Result<HardwareAddress>;
}

impl<T: InterfaceControl + ?Sized> InterfaceControl for &T {
    fn interface_config(&self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).interface_config(buf)
    }

    fn interface_flags(&self, name: &OsStr) -> io::Result<InterfaceFlags> {
        (**self).interface_flags(name)
    }

    fn hardware_address(&self, name: &OsStr) -> io::Result<HardwareAddress> {
        (**self).hardware_address(name)
    }
}
