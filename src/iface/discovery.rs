//! Default interface discovery
//!
//! Finds the interface a packet tool should use when none is named:
//! 1. Query the size of the interface configuration, then fetch it into a buffer
//!    of exactly that size
//! 2. Walk the records in listing order
//! 3. Pick the first that is up, running, not loopback, Ethernet-family
//!    and carries an Ethernet-style name
//!
//! A failing per-record query aborts the whole search.

use crate::error::{Error, Result};
use crate::iface::control::InterfaceControl;
use crate::iface::interface::{InterfaceListing, InterfaceRecord};
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// Name fragments accepted as Ethernet-style
pub const ETHERNET_NAME_PATTERNS: [&str; 2] = ["eth", "en"];

/// Naming heuristic for Ethernet interfaces (`eth0`, `enp3s0`, `eno1`, ...)
///
/// Matches on raw bytes, so names that are not UTF-8 are still checked.
pub fn is_ethernet_name<S: AsRef<OsStr> + ?Sized>(name: &S) -> bool {
    let name = name.as_ref().as_bytes();
    ETHERNET_NAME_PATTERNS.iter().any(|pattern| {
        name.windows(pattern.len())
            .any(|window| window == pattern.as_bytes())
    })
}

/// Retrieve every interface known to the kernel, in listing order
pub fn list_interfaces<C: InterfaceControl>(ctl: &C) -> Result<InterfaceListing> {
    let required = ctl.interface_config(&mut []).map_err(Error::GetConfig)?;
    debug!("SIOCGIFCONF requires {} bytes", required);

    let mut buf = vec![0u8; required];
    let written = ctl.interface_config(&mut buf).map_err(Error::GetConfig)?;
    buf.truncate(written);

    let listing = InterfaceListing::from_bytes(&buf);
    debug!("Interface listing holds {} records", listing.len());
    Ok(listing)
}

/// Select the default Ethernet interface
pub fn select_interface<C: InterfaceControl>(ctl: &C) -> Result<InterfaceRecord> {
    let listing = list_interfaces(ctl)?;

    match find_ethernet(ctl, &listing)? {
        Some(record) => {
            info!(
                "Using interface: {} ({})",
                record.name.to_string_lossy(),
                record.hardware_address
            );
            Ok(record)
        }
        None => {
            warn!("No active ethernet interface among {} records", listing.len());
            Err(Error::InterfaceNotFound)
        }
    }
}

fn find_ethernet<C: InterfaceControl>(
    ctl: &C,
    listing: &InterfaceListing,
) -> Result<Option<InterfaceRecord>> {
    for name in listing.iter() {
        let display = name.to_string_lossy();

        let flags = ctl.interface_flags(name).map_err(|source| Error::GetFlags {
            name: display.to_string(),
            source,
        })?;

        if !flags.is_active() {
            debug!("Skipping {}: not active ({:?})", display, flags);
            continue;
        }

        let hardware_address = ctl.hardware_address(name).map_err(|source| Error::GetHwAddr {
            name: display.to_string(),
            source,
        })?;

        if !hardware_address.is_ethernet() {
            debug!("Skipping {}: hardware family {}", display, hardware_address.family);
            continue;
        }

        if !is_ethernet_name(name) {
            debug!("Skipping {}: name does not look like ethernet", display);
            continue;
        }

        return Ok(Some(InterfaceRecord {
            name: name.to_os_string(),
            flags,
            hardware_address,
        }));
    }

    Ok(None)
}
