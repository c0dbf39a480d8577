//! Raw packet socket paired with the host's default Ethernet interface

use crate::error::{Error, Result};
use crate::iface::discovery::select_interface;
use crate::iface::interface::{HardwareAddress, InterfaceRecord};
use crate::socket::raw::{open_packet_socket, SocketControl};
use log::debug;
use std::ffi::{OsStr, OsString};
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

/// An open `AF_PACKET` socket and the interface chosen for it
///
/// Construction either yields a usable socket with a selected interface or
/// fails; the descriptor is closed on drop and on every failure path.
#[derive(Debug)]
pub struct InterfaceSocket {
    fd: OwnedFd,
    ifname: String,
    ifname_raw: OsString,
    hardware_address: HardwareAddress,
    err: i32,
}

impl InterfaceSocket {
    /// Open a raw socket and pick the default Ethernet interface
    pub fn new() -> Result<Self> {
        Self::open_with(open_packet_socket, |fd| {
            select_interface(&SocketControl::new(fd))
        })
    }

    /// Open the socket with `open`, then run `select` against it
    ///
    /// `select` is never called when `open` fails.
    pub(crate) fn open_with<O, S>(open: O, select: S) -> Result<Self>
    where
        O: FnOnce() -> io::Result<OwnedFd>,
        S: FnOnce(BorrowedFd<'_>) -> Result<InterfaceRecord>,
    {
        let fd = open().map_err(Error::SocketCreation)?;
        debug!("Opened packet socket fd {}", fd.as_raw_fd());

        // On error `fd` is dropped here, closing the socket
        let record = select(fd.as_fd())?;

        Ok(InterfaceSocket {
            fd,
            ifname: record.name.to_string_lossy().into_owned(),
            ifname_raw: record.name,
            hardware_address: record.hardware_address,
            err: 0,
        })
    }

    /// Raw descriptor; ownership stays with this socket
    pub fn fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }

    /// Name of the selected interface
    ///
    /// Bytes that are not UTF-8 are replaced; see [`InterfaceSocket::ifname_os`].
    pub fn ifname(&self) -> &str {
        &self.ifname
    }

    /// Name of the selected interface as the kernel reported it
    pub fn ifname_os(&self) -> &OsStr {
        &self.ifname_raw
    }

    /// MAC address of the selected interface
    pub fn hardware_address(&self) -> HardwareAddress {
        self.hardware_address
    }

    /// Last OS error number observed, zero if none
    pub fn err(&self) -> i32 {
        self.err
    }
}

impl AsFd for InterfaceSocket {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for InterfaceSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::iface::control::InterfaceControl;
    use crate::iface::interface::{encode_listing, InterfaceFlags, ARPHRD_ETHER};
    use std::cell::Cell;
    use std::os::fd::FromRawFd;
    use std::os::unix::ffi::OsStrExt;

    /// Host where every listed interface is an active Ethernet device
    struct EthernetHost {
        names: Vec<OsString>,
        calls: Cell<usize>,
    }

    impl EthernetHost {
        fn new(names: &[&OsStr]) -> Self {
            EthernetHost {
                names: names.iter().map(|n| n.to_os_string()).collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl InterfaceControl for EthernetHost {
        fn interface_config(&self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls.set(self.calls.get() + 1);
            let listing = encode_listing(&self.names);
            if buf.is_empty() {
                return Ok(listing.len());
            }
            let len = listing.len().min(buf.len());
            buf[..len].copy_from_slice(&listing[..len]);
            Ok(len)
        }

        fn interface_flags(&self, _name: &OsStr) -> io::Result<InterfaceFlags> {
            self.calls.set(self.calls.get() + 1);
            Ok(InterfaceFlags::UP | InterfaceFlags::RUNNING)
        }

        fn hardware_address(&self, _name: &OsStr) -> io::Result<HardwareAddress> {
            self.calls.set(self.calls.get() + 1);
            Ok(HardwareAddress::new(ARPHRD_ETHER, [0x02, 0, 0, 0, 0, 0x02]))
        }
    }

    fn datagram_socket() -> io::Result<OwnedFd> {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }

    #[test]
    fn test_creation_failure_skips_discovery() {
        let host = EthernetHost::new(&[OsStr::new("eth0")]);

        let err = InterfaceSocket::open_with(
            || Err(io::Error::from_raw_os_error(libc::EPERM)),
            |_| select_interface(&host),
        )
        .unwrap_err();

        assert_eq!(err.code(), ErrorCode::SocketCreationFailed);
        assert_eq!(err.errno(), libc::EPERM);
        assert_eq!(err.step(), "create_fd");
        assert_eq!(host.calls.get(), 0);
    }

    #[test]
    fn test_open_then_select() {
        let host = EthernetHost::new(&[OsStr::new("eth0"), OsStr::new("eth1")]);

        let sock = InterfaceSocket::open_with(datagram_socket, |_| select_interface(&host)).unwrap();
        assert_eq!(sock.ifname(), "eth0");
        assert_eq!(sock.ifname_os(), "eth0");
        assert_eq!(sock.err(), 0);
        assert!(sock.fd() >= 0);
    }

    #[test]
    fn test_discovery_failure_after_open() {
        let host = EthernetHost::new(&[]);

        let err = InterfaceSocket::open_with(datagram_socket, |_| select_interface(&host))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InterfaceNotFound);
        assert_eq!(err.errno(), 0);
        assert_eq!(err.step(), "set_ifname");
    }

    #[test]
    fn test_non_utf8_ifname() {
        let host = EthernetHost::new(&[OsStr::from_bytes(b"enp\xff1")]);

        let sock = InterfaceSocket::open_with(datagram_socket, |_| select_interface(&host)).unwrap();
        assert_eq!(sock.ifname_os().as_bytes(), b"enp\xff1");
        assert_eq!(sock.ifname(), "enp\u{fffd}1");
    }

    #[test]
    fn test_construction_outcome() {
        match InterfaceSocket::new() {
            Ok(sock) => {
                assert!(sock.fd() >= 0);
                assert!(!sock.ifname().is_empty());
                assert!(crate::is_ethernet_name(sock.ifname_os()));
                assert!(sock.hardware_address().is_ethernet());
                assert_eq!(sock.err(), 0);
            }
            Err(e) => match e.code() {
                ErrorCode::SocketCreationFailed => assert_ne!(e.errno(), 0),
                ErrorCode::InterfaceNotFound => assert_eq!(e.errno(), 0),
                code => panic!("unexpected failure {}: {}", code, e),
            },
        }
    }
}
