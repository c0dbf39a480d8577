//! Error types for socket acquisition and interface discovery
//!
//! Every step of construction either succeeds or aborts the whole sequence
//! with one of these errors. Each variant maps to a stable numeric code.

use std::fmt;
use std::io;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric failure codes
///
/// The values are grouped by family: 1xx for lookup outcomes, 2xx for
/// interface ioctls, 3xx for socket calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    InterfaceNotFound = 101,
    IoctlGetConfigFailed = 201,
    IoctlGetFlagsFailed = 202,
    IoctlGetHwAddrFailed = 204,
    SocketCreationFailed = 301,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn value(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Failure raised while opening the socket or choosing an interface
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create raw packet socket{}", Suffix(ErrorCode::SocketCreationFailed, .0))]
    SocketCreation(#[source] io::Error),

    #[error("SIOCGIFCONF failed{}", Suffix(ErrorCode::IoctlGetConfigFailed, .0))]
    GetConfig(#[source] io::Error),

    #[error("SIOCGIFFLAGS failed for {name}{}", Suffix(ErrorCode::IoctlGetFlagsFailed, .source))]
    GetFlags {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("SIOCGIFHWADDR failed for {name}{}", Suffix(ErrorCode::IoctlGetHwAddrFailed, .source))]
    GetHwAddr {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("no active ethernet interface found [code: {}]", ErrorCode::InterfaceNotFound)]
    InterfaceNotFound,
}

impl Error {
    /// Numeric code of the failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::SocketCreation(_) => ErrorCode::SocketCreationFailed,
            Error::GetConfig(_) => ErrorCode::IoctlGetConfigFailed,
            Error::GetFlags { .. } => ErrorCode::IoctlGetFlagsFailed,
            Error::GetHwAddr { .. } => ErrorCode::IoctlGetHwAddrFailed,
            Error::InterfaceNotFound => ErrorCode::InterfaceNotFound,
        }
    }

    /// OS error number captured at the failing call, zero if none
    pub fn errno(&self) -> i32 {
        match self {
            Error::SocketCreation(e) | Error::GetConfig(e) => raw_errno(e),
            Error::GetFlags { source, .. } | Error::GetHwAddr { source, .. } => raw_errno(source),
            Error::InterfaceNotFound => 0,
        }
    }

    /// Construction step that aborted
    pub fn step(&self) -> &'static str {
        match self {
            Error::SocketCreation(_) => "create_fd",
            _ => "set_ifname",
        }
    }

    /// Interface the failing per-record query was issued for
    pub fn interface(&self) -> Option<&str> {
        match self {
            Error::GetFlags { name, .. } | Error::GetHwAddr { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn raw_errno(e: &io::Error) -> i32 {
    e.raw_os_error().unwrap_or(0)
}

/// Renders ` [code: N][errno: E]`, leaving out errno when it is zero
struct Suffix<'a>(ErrorCode, &'a io::Error);

impl fmt::Display for Suffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " [code: {}]", self.0)?;
        match raw_errno(self.1) {
            0 => Ok(()),
            errno => write!(f, "[errno: {}]", errno),
        }
    }
}
