//! Interface records as reported by the kernel
//!
//! This module decodes the interface-configuration buffer into names and
//! provides the typed views of the per-record queries:
//! - Administrative/operational flags
//! - Link-layer hardware address and its family

use bitflags::bitflags;
use byteorder::{ByteOrder, NativeEndian};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::mem;
use std::os::unix::ffi::{OsStrExt, OsStringExt};

/// Maximum interface name length, including the trailing NUL
pub const IFNAMSIZ: usize = libc::IFNAMSIZ;

/// Size in bytes of one record in the interface-configuration buffer
pub const IFREQ_SIZE: usize = mem::size_of::<IfReq>();

/// Hardware family of Ethernet interfaces
pub const ARPHRD_ETHER: u16 = libc::ARPHRD_ETHER;

/// Kernel `struct ifreq`
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct IfReq {
    pub ifr_name: [u8; IFNAMSIZ],
    pub ifr_ifru: IfReqData,
}

/// Request-specific part of `struct ifreq`
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) union IfReqData {
    pub flags: libc::c_short,
    pub hwaddr: libc::sockaddr,
    // Largest member is `struct ifmap`, which fixes the record size
    _map: [libc::c_ulong; 3],
}

impl IfReq {
    /// Zeroed request addressed to `name`, truncated to fit `IFNAMSIZ`
    pub fn with_name(name: &OsStr) -> Self {
        // SAFETY: all-zero bytes are a valid value for every member
        let mut req: IfReq = unsafe { mem::zeroed() };
        let bytes = name.as_bytes();
        let len = bytes.len().min(IFNAMSIZ - 1);
        req.ifr_name[..len].copy_from_slice(&bytes[..len]);
        req
    }
}

/// Kernel `struct ifconf`
#[repr(C)]
pub(crate) struct IfConf {
    pub ifc_len: libc::c_int,
    pub ifc_buf: *mut libc::c_char,
}

bitflags! {
    /// Interface flags returned by `SIOCGIFFLAGS`
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InterfaceFlags: u32 {
        /// Administratively up
        const UP = libc::IFF_UP as u32;
        const BROADCAST = libc::IFF_BROADCAST as u32;
        const LOOPBACK = libc::IFF_LOOPBACK as u32;
        const POINTOPOINT = libc::IFF_POINTOPOINT as u32;
        /// Operationally running
        const RUNNING = libc::IFF_RUNNING as u32;
        const PROMISC = libc::IFF_PROMISC as u32;
        const MULTICAST = libc::IFF_MULTICAST as u32;
    }
}

impl InterfaceFlags {
    /// Convert the raw `ifr_flags` field, keeping unknown bits
    pub fn from_raw(raw: libc::c_short) -> Self {
        InterfaceFlags::from_bits_retain(raw as u16 as u32)
    }

    /// Up, running, and not loopback
    pub fn is_active(&self) -> bool {
        self.contains(InterfaceFlags::UP | InterfaceFlags::RUNNING)
            && !self.contains(InterfaceFlags::LOOPBACK)
    }
}

/// Link-layer address returned by `SIOCGIFHWADDR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareAddress {
    /// `ARPHRD_*` hardware type
    pub family: u16,
    pub octets: [u8; 6],
}

impl HardwareAddress {
    pub fn new(family: u16, octets: [u8; 6]) -> Self {
        HardwareAddress { family, octets }
    }

    /// Parse from the raw bytes of a `struct sockaddr`
    ///
    /// Returns None if the data is too short to hold a family and a MAC.
    pub fn from_sockaddr_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }

        let mut octets = [0u8; 6];
        octets.copy_from_slice(&data[2..8]);
        Some(HardwareAddress {
            family: NativeEndian::read_u16(&data[0..2]),
            octets,
        })
    }

    pub fn is_ethernet(&self) -> bool {
        self.family == ARPHRD_ETHER
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.octets;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

/// An interface chosen by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    /// Name exactly as the kernel reported it
    pub name: OsString,
    pub flags: InterfaceFlags,
    pub hardware_address: HardwareAddress,
}

/// Ordered interface names from one `SIOCGIFCONF` round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceListing {
    names: Vec<OsString>,
}

impl InterfaceListing {
    /// Decode a filled configuration buffer
    ///
    /// Only whole records are decoded; a trailing partial record is ignored.
    /// Names keep their raw bytes, which need not be UTF-8.
    pub fn from_bytes(data: &[u8]) -> Self {
        let names = data
            .chunks_exact(IFREQ_SIZE)
            .map(|record| {
                let raw = &record[..IFNAMSIZ];
                let end = raw.iter().position(|&b| b == 0).unwrap_or(IFNAMSIZ);
                OsString::from_vec(raw[..end].to_vec())
            })
            .collect();

        InterfaceListing { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OsStr> {
        self.names.iter().map(OsString::as_os_str)
    }

    pub fn into_names(self) -> Vec<OsString> {
        self.names
    }
}

/// Encode names the way the kernel lays out a configuration buffer
#[cfg(test)]
pub(crate) fn encode_listing<S: AsRef<OsStr>>(names: &[S]) -> Vec<u8> {
    let mut buf = vec![0u8; names.len() * IFREQ_SIZE];
    for (record, name) in buf.chunks_exact_mut(IFREQ_SIZE).zip(names) {
        let bytes = name.as_ref().as_bytes();
        record[..bytes.len()].copy_from_slice(bytes);
    }
    buf
}
