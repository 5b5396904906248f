//! 128 bit identifiers such as the machine ID and the boot ID.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::error::{io_bail, io_bail_errno, io_format_err};

/// Location of the machine ID.
pub const MACHINE_ID_PATH: &str = "/etc/machine-id";

/// Location of the kernel provided boot ID.
pub const BOOT_ID_PATH: &str = "/proc/sys/kernel/random/boot_id";

/// A 128 bit ID.
///
/// Formatted as 32 lower case hexadecimal digits without dashes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Id128(pub [u8; 16]);

impl Id128 {
    /// The all-zero ID.
    pub const NULL: Id128 = Id128([0; 16]);

    /// Parse an ID from either 32 hexadecimal digits or the 36 character UUID format.
    pub fn parse(s: &str) -> io::Result<Self> {
        let mut id = [0u8; 16];
        let res = match s.len() {
            32 => hex::decode_to_slice(s, &mut id),
            36 => {
                let b = s.as_bytes();
                if b[8] != b'-' || b[13] != b'-' || b[18] != b'-' || b[23] != b'-' {
                    io_bail!("malformed UUID {s:?}");
                }
                let plain: String = s.chars().filter(|&c| c != '-').collect();
                hex::decode_to_slice(plain, &mut id)
            }
            len => io_bail!("invalid 128 bit ID length {len}"),
        };
        res.map_err(|err| io_format_err!("invalid 128 bit ID {s:?}: {err}"))?;
        Ok(Self(id))
    }

    /// Whether this is the all-zero ID.
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Read an ID from a file containing it on a single line.
    pub fn read<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let line = content.strip_suffix('\n').unwrap_or(&content);
        Self::parse(line)
    }

    /// The machine ID.
    ///
    /// An unset (empty or all-zero) machine ID results in `ENOMEDIUM`.
    pub fn machine() -> io::Result<Self> {
        Self::machine_from(MACHINE_ID_PATH)
    }

    /// Read a machine ID file such as [`MACHINE_ID_PATH`].
    ///
    /// Errors reading the file are returned as is. An empty, malformed or all-zero ID results in
    /// `ENOMEDIUM`.
    pub fn machine_from<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let id = match Self::read(path) {
            Ok(id) => id,
            Err(err) if err.raw_os_error().is_some() => return Err(err),
            Err(err) => {
                log::debug!("failed to parse {}: {err}", path.display());
                io_bail_errno!(libc::ENOMEDIUM);
            }
        };
        if id.is_null() {
            io_bail_errno!(libc::ENOMEDIUM);
        }
        Ok(id)
    }

    /// The ID of the current boot.
    pub fn boot() -> io::Result<Self> {
        let id = Self::read(BOOT_ID_PATH)?;
        if id.is_null() {
            io_bail_errno!(libc::ENOMEDIUM);
        }
        Ok(id)
    }
}

impl FromStr for Id128 {
    type Err = io::Error;

    fn from_str(s: &str) -> io::Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Id128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

fn resolve_machine_id() -> io::Result<String> {
    Ok(Id128::machine()?.to_string())
}

fn resolve_boot_id() -> io::Result<String> {
    Ok(Id128::boot()?.to_string())
}

impl_resolve! {
    /// Resolves to the machine ID.
    MachineId => resolve_machine_id,

    /// Resolves to the boot ID.
    BootId => resolve_boot_id,
}
