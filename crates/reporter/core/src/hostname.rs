//! Local hostname resolution for host-tagged measurements.

use crate::HostnameError;
use auto_impl::auto_impl;
use std::fmt::Debug;

/// Resolves the name measurements are prefixed with when host tagging is enabled.
#[auto_impl(&, Arc, Box)]
pub trait HostnameResolver: Debug + Send + Sync {
    /// Returns the hostname.
    fn hostname(&self) -> Result<String, HostnameError>;
}

/// Resolves the hostname from the operating system on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameResolver for SystemHostname {
    fn hostname(&self) -> Result<String, HostnameError> {
        system_hostname()
    }
}

/// Always resolves to the same, preconfigured name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Constructor)]
pub struct StaticHostname(String);

impl HostnameResolver for StaticHostname {
    fn hostname(&self) -> Result<String, HostnameError> {
        if self.0.is_empty() {
            return Err(HostnameError::Empty);
        }
        Ok(self.0.clone())
    }
}

#[cfg(unix)]
fn system_hostname() -> Result<String, HostnameError> {
    let mut buf = [0u8; 256];
    // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = std::str::from_utf8(&buf[..len]).map_err(|_| HostnameError::InvalidUtf8)?;
    if name.is_empty() {
        return Err(HostnameError::Empty);
    }
    Ok(name.to_string())
}

#[cfg(not(unix))]
fn system_hostname() -> Result<String, HostnameError> {
    match std::env::var("COMPUTERNAME") {
        Ok(name) if !name.is_empty() => Ok(name),
        _ => Err(HostnameError::Unsupported),
    }
}
