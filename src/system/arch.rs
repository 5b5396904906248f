//! CPU architecture names as used by service managers and the `ConditionArchitecture=` family.

use std::fmt;
use std::io;

use super::Uname;
use crate::error::io_format_err;

macro_rules! arch_table {
    ($(
        $(#[$doc:meta])*
        $variant:ident = $name:literal
    ),+ $(,)?) => {
        /// A CPU architecture.
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        #[non_exhaustive]
        pub enum Arch {
            $(
                $(#[$doc])*
                $variant,
            )+
        }

        impl Arch {
            /// The canonical name, eg. `x86-64`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Arch::$variant => $name, )+
                }
            }

            /// Look up an architecture by its canonical name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Arch::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

arch_table! {
    /// 32 bit x86.
    X86 = "x86",
    /// 64 bit x86.
    X86_64 = "x86-64",
    /// 32 bit PowerPC, big endian.
    Ppc = "ppc",
    /// 32 bit PowerPC, little endian.
    PpcLe = "ppc-le",
    /// 64 bit PowerPC, big endian.
    Ppc64 = "ppc64",
    /// 64 bit PowerPC, little endian.
    Ppc64Le = "ppc64-le",
    /// Itanium.
    Ia64 = "ia64",
    /// 32 bit PA-RISC.
    Parisc = "parisc",
    /// 64 bit PA-RISC.
    Parisc64 = "parisc64",
    /// 31 bit s390.
    S390 = "s390",
    /// 64 bit s390.
    S390x = "s390x",
    /// 32 bit SPARC.
    Sparc = "sparc",
    /// 64 bit SPARC.
    Sparc64 = "sparc64",
    /// 32 bit MIPS, big endian.
    Mips = "mips",
    /// 32 bit MIPS, little endian.
    MipsLe = "mips-le",
    /// 64 bit MIPS, big endian.
    Mips64 = "mips64",
    /// 64 bit MIPS, little endian.
    Mips64Le = "mips64-le",
    /// DEC Alpha.
    Alpha = "alpha",
    /// 32 bit ARM, little endian.
    Arm = "arm",
    /// 32 bit ARM, big endian.
    ArmBe = "arm-be",
    /// 64 bit ARM, little endian.
    Arm64 = "arm64",
    /// 64 bit ARM, big endian.
    Arm64Be = "arm64-be",
    /// SuperH.
    Sh = "sh",
    /// 64 bit SuperH.
    Sh64 = "sh64",
    /// Motorola 68k.
    M68k = "m68k",
    /// TILE-Gx.
    Tilegx = "tilegx",
    /// ETRAX CRIS.
    Cris = "cris",
    /// Nios II.
    Nios2 = "nios2",
    /// 32 bit RISC-V.
    Riscv32 = "riscv32",
    /// 64 bit RISC-V.
    Riscv64 = "riscv64",
    /// ARC, little endian.
    Arc = "arc",
    /// ARC, big endian.
    ArcBe = "arc-be",
    /// 64 bit LoongArch.
    Loongarch64 = "loongarch64",
}

impl Arch {
    /// Map the `machine` field of `uname(2)` to an architecture.
    pub fn from_uname_machine(machine: &str) -> Option<Self> {
        let little_endian = cfg!(target_endian = "little");

        Some(match machine {
            "x86_64" | "amd64" => Arch::X86_64,
            "i386" | "i486" | "i586" | "i686" => Arch::X86,
            "aarch64" => Arch::Arm64,
            "aarch64_be" => Arch::Arm64Be,
            "ppc64le" => Arch::Ppc64Le,
            "ppc64" => Arch::Ppc64,
            "ppcle" => Arch::PpcLe,
            "ppc" => Arch::Ppc,
            "ia64" => Arch::Ia64,
            "parisc64" => Arch::Parisc64,
            "parisc" => Arch::Parisc,
            "s390x" => Arch::S390x,
            "s390" => Arch::S390,
            "sparc64" => Arch::Sparc64,
            "sparc" => Arch::Sparc,
            "mips64" if little_endian => Arch::Mips64Le,
            "mips64" => Arch::Mips64,
            "mips" if little_endian => Arch::MipsLe,
            "mips" => Arch::Mips,
            "alpha" => Arch::Alpha,
            "sh64" | "sh5" => Arch::Sh64,
            "m68k" => Arch::M68k,
            "tilegx" => Arch::Tilegx,
            "cris" | "crisv32" => Arch::Cris,
            "nios2" => Arch::Nios2,
            "riscv32" => Arch::Riscv32,
            "riscv64" => Arch::Riscv64,
            "arc" => Arch::Arc,
            "arceb" => Arch::ArcBe,
            "loongarch64" => Arch::Loongarch64,
            m if m.starts_with("arm") && m.ends_with('b') => Arch::ArmBe,
            m if m.starts_with("arm") => Arch::Arm,
            m if m.starts_with("sh") => Arch::Sh,
            _ => return None,
        })
    }

    /// The architecture of the running kernel.
    pub fn native() -> io::Result<Self> {
        let machine = Uname::new()?.machine();
        Self::from_uname_machine(&machine)
            .ok_or_else(|| io_format_err!("unknown architecture {machine:?}"))
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn resolve_architecture() -> io::Result<String> {
    Ok(Arch::native()?.as_str().to_owned())
}

impl_resolve! {
    /// Resolves to the name of the running kernel's architecture.
    Architecture => resolve_architecture,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uname_machines() {
        assert_eq!(Arch::from_uname_machine("x86_64"), Some(Arch::X86_64));
        assert_eq!(Arch::from_uname_machine("i686"), Some(Arch::X86));
        assert_eq!(Arch::from_uname_machine("aarch64"), Some(Arch::Arm64));
        assert_eq!(Arch::from_uname_machine("armv7l"), Some(Arch::Arm));
        assert_eq!(Arch::from_uname_machine("armv7b"), Some(Arch::ArmBe));
        assert_eq!(Arch::from_uname_machine("ppc64le"), Some(Arch::Ppc64Le));
        assert_eq!(Arch::from_uname_machine("s390x"), Some(Arch::S390x));
        assert_eq!(Arch::from_uname_machine("sh4"), Some(Arch::Sh));
        assert_eq!(Arch::from_uname_machine("riscv64"), Some(Arch::Riscv64));
        assert_eq!(Arch::from_uname_machine("vax"), None);
    }

    #[test]
    fn names() {
        assert_eq!(Arch::X86_64.to_string(), "x86-64");
        assert_eq!(Arch::Arm64Be.as_str(), "arm64-be");
        assert_eq!(Arch::from_name("loongarch64"), Some(Arch::Loongarch64));
        assert_eq!(Arch::from_name("x86_64"), None);
    }

    #[test]
    fn native() {
        let arch = Arch::native().unwrap();
        assert_eq!(Arch::from_name(arch.as_str()), Some(arch));
    }
}
