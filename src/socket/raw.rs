//! Raw link-layer socket and the interface ioctls issued on it

use crate::iface::control::InterfaceControl;
use crate::iface::interface::{HardwareAddress, IfConf, IfReq, InterfaceFlags};
use byteorder::{BigEndian, ByteOrder};
use std::ffi::OsStr;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};

/// Convert a host-order value to network byte order
pub fn network_order(value: u16) -> u16 {
    let mut bytes = [0u8; 2];
    BigEndian::write_u16(&mut bytes, value);
    u16::from_ne_bytes(bytes)
}

/// Open an `AF_PACKET` raw socket receiving every protocol
pub fn open_packet_socket() -> io::Result<OwnedFd> {
    let protocol = network_order(libc::ETH_P_ALL as u16);

    // SAFETY: plain syscall, no pointers involved
    let fd = unsafe { libc::socket(libc::AF_PACKET, libc::SOCK_RAW, protocol as libc::c_int) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: fd was just returned by socket() and nothing else owns it
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Interface queries issued through ioctl on a borrowed socket
pub struct SocketControl<'fd> {
    fd: BorrowedFd<'fd>,
}

impl<'fd> SocketControl<'fd> {
    pub fn new(fd: BorrowedFd<'fd>) -> Self {
        SocketControl { fd }
    }

    fn ioctl_ifreq(&self, request: libc::c_ulong, req: &mut IfReq) -> io::Result<()> {
        // SAFETY: req is a properly sized and aligned `struct ifreq`
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), request as _, req as *mut IfReq) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl InterfaceControl for SocketControl<'_> {
    fn interface_config(&self, buf: &mut [u8]) -> io::Result<usize> {
        let len = libc::c_int::try_from(buf.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "buffer too large"))?;
        let mut ifc = IfConf {
            ifc_len: len,
            ifc_buf: if buf.is_empty() {
                std::ptr::null_mut()
            } else {
                buf.as_mut_ptr() as *mut libc::c_char
            },
        };

        // SAFETY: ifc_buf is null (size query) or points at ifc_len writable bytes
        let ret = unsafe {
            libc::ioctl(self.fd.as_raw_fd(), libc::SIOCGIFCONF as _, &mut ifc as *mut IfConf)
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(usize::try_from(ifc.ifc_len).unwrap_or(0))
    }

    fn interface_flags(&self, name: &OsStr) -> io::Result<InterfaceFlags> {
        let mut req = IfReq::with_name(name);
        self.ioctl_ifreq(libc::SIOCGIFFLAGS as libc::c_ulong, &mut req)?;

        // SAFETY: SIOCGIFFLAGS filled the flags member
        Ok(InterfaceFlags::from_raw(unsafe { req.ifr_ifru.flags }))
    }

    fn hardware_address(&self, name: &OsStr) -> io::Result<HardwareAddress> {
        let mut req = IfReq::with_name(name);
        self.ioctl_ifreq(libc::SIOCGIFHWADDR as libc::c_ulong, &mut req)?;

        // SAFETY: SIOCGIFHWADDR filled the hwaddr member, a plain sockaddr
        let sockaddr = unsafe { req.ifr_ifru.hwaddr };
        let bytes = unsafe {
            std::slice::from_raw_parts(
                &sockaddr as *const libc::sockaddr as *const u8,
                mem::size_of::<libc::sockaddr>(),
            )
        };

        HardwareAddress::from_sockaddr_bytes(bytes)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "short hardware address"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iface::discovery::list_interfaces;
    use std::os::fd::AsFd;

    #[test]
    fn test_network_order() {
        assert_eq!(network_order(0x0003).to_ne_bytes(), [0x00, 0x03]);
        assert_eq!(network_order(0x1234).to_ne_bytes(), [0x12, 0x34]);
    }

    #[test]
    fn test_ioctls_on_datagram_socket() {
        // Interface ioctls work on any socket, so an unprivileged UDP socket
        // exercises the same code paths as the packet socket.
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        assert!(fd >= 0);
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        let ctl = SocketControl::new(fd.as_fd());

        let listing = list_interfaces(&ctl).unwrap();
        for name in listing.iter() {
            ctl.interface_flags(name).unwrap();
        }
    }

    #[test]
    fn test_loopback_flags() {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        assert!(fd >= 0);
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        let ctl = SocketControl::new(fd.as_fd());

        // Hosts without a loopback device have nothing to check
        if let Ok(flags) = ctl.interface_flags(OsStr::new("lo")) {
            assert!(flags.contains(InterfaceFlags::LOOPBACK));
            assert!(!flags.is_active());
        }
    }

    #[test]
    fn test_unknown_interface_flags() {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        assert!(fd >= 0);
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        let ctl = SocketControl::new(fd.as_fd());

        let err = ctl.interface_flags(OsStr::new("nosuchif0")).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENODEV));
    }
}
