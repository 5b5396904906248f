//! Kernel and host name information from `uname(2)`.

use std::ffi::c_char;
use std::io;
use std::mem::MaybeUninit;

use crate::error::io_bail_last;

/// The host name used when the kernel has none configured.
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// The result of a `uname(2)` call.
pub struct Uname {
    inner: libc::utsname,
}

impl Uname {
    /// Query the kernel.
    pub fn new() -> io::Result<Self> {
        let mut uts = MaybeUninit::<libc::utsname>::zeroed();
        if unsafe { libc::uname(uts.as_mut_ptr()) } != 0 {
            io_bail_last!();
        }
        Ok(Self {
            inner: unsafe { uts.assume_init() },
        })
    }

    /// The network node name.
    pub fn nodename(&self) -> String {
        field(&self.inner.nodename)
    }

    /// The kernel release, eg. `6.8.0-45-generic`.
    pub fn release(&self) -> String {
        field(&self.inner.release)
    }

    /// The machine hardware name, eg. `x86_64`.
    pub fn machine(&self) -> String {
        field(&self.inner.machine)
    }

    /// The host name, falling back to [`FALLBACK_HOSTNAME`] if none is set.
    pub fn host_name(&self) -> String {
        host_name_or_fallback(self.nodename())
    }
}

impl std::fmt::Debug for Uname {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Uname")
            .field("nodename", &self.nodename())
            .field("release", &self.release())
            .field("machine", &self.machine())
            .finish_non_exhaustive()
    }
}

fn field(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn host_name_or_fallback(name: String) -> String {
    if name.is_empty() || name == "(none)" {
        FALLBACK_HOSTNAME.to_owned()
    } else {
        name
    }
}

fn short_host_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn resolve_host_name() -> io::Result<String> {
    Ok(Uname::new()?.host_name())
}

fn resolve_short_host_name() -> io::Result<String> {
    let name = Uname::new()?.host_name();
    Ok(short_host_name(&name).to_owned())
}

fn resolve_kernel_release() -> io::Result<String> {
    Ok(Uname::new()?.release())
}

impl_resolve! {
    /// Resolves to the host name.
    HostName => resolve_host_name,

    /// Resolves to the host name truncated at the first dot.
    ShortHostName => resolve_short_host_name,

    /// Resolves to the kernel release.
    KernelRelease => resolve_kernel_release,
}
