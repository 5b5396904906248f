//! Resolvers for properties of the running system.
//!
//! Every resolver here ignores the userdata and implements [`Resolve`](crate::Resolve) for any
//! userdata type, so they can be mixed freely with application specific entries in one table.
//!
//! | Specifier | Resolver | Meaning |
//! |---|---|---|
//! | `%H` | [`HostName`] | host name |
//! | `%l` | [`ShortHostName`] | host name up to the first dot |
//! | `%m` | [`MachineId`] | machine ID |
//! | `%b` | [`BootId`] | boot ID |
//! | `%v` | [`KernelRelease`] | kernel release |
//! | `%a` | [`Architecture`] | architecture |
//! | `%o` | [`OsReleaseField::ID`] | OS ID |
//! | `%w` | [`OsReleaseField::VERSION_ID`] | OS version ID |
//! | `%B` | [`OsReleaseField::BUILD_ID`] | OS build ID |
//! | `%W` | [`OsReleaseField::VARIANT_ID`] | OS variant ID |
//! | `%M` | [`OsReleaseField::IMAGE_ID`] | OS image ID |
//! | `%A` | [`OsReleaseField::IMAGE_VERSION`] | OS image version |
//! | `%u` | [`UserName`] | user name |
//! | `%U` | [`UserId`] | numeric user ID |
//! | `%g` | [`GroupName`] | group name |
//! | `%G` | [`GroupId`] | numeric group ID |
//! | `%h` | [`UserHome`] | home directory |
//! | `%s` | [`UserShell`] | login shell |
//! | `%T` | [`TmpDir`] | temporary directory |
//! | `%V` | [`VarTmpDir`] | temporary directory for larger, persistent files |

use bitflags::bitflags;

use crate::specifier::Specifier;

/// Declare resolver types which call a `fn() -> io::Result<String>` for any userdata.
macro_rules! impl_resolve {
    ($(
        $(#[$doc:meta])*
        $name:ident => $func:path
    ),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
            pub struct $name;

            impl<U: ?Sized> $crate::specifier::Resolve<U> for $name {
                fn resolve(&self, _specifier: char, _userdata: &U) -> ::std::io::Result<String> {
                    $func()
                }
            }
        )+
    };
}

pub mod arch;
pub mod id128;
pub mod os_release;
pub mod tmp;
pub mod uname;
pub mod user;

#[doc(inline)]
pub use arch::Architecture;
#[doc(inline)]
pub use id128::{BootId, Id128, MachineId};
#[doc(inline)]
pub use os_release::{OsRelease, OsReleaseField};
#[doc(inline)]
pub use tmp::{TmpDir, VarTmpDir};
#[doc(inline)]
pub use uname::{HostName, KernelRelease, ShortHostName, Uname};
#[doc(inline)]
pub use user::{GroupId, GroupName, UserHome, UserId, UserName, UserShell};

bitflags! {
    /// Groups of specifiers to include in a [`standard_specifiers`] table.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct SystemSpecifiers: u32 {
        /// `%H %l %m %b %v %a`: host, machine and kernel properties.
        const HOST       = 0x0000_0001;

        /// `%o %w %B %W %M %A`: fields from `os-release(5)`.
        const OS_RELEASE = 0x0000_0002;

        /// `%u %U %g %G %h %s`: the calling user and group.
        const USER       = 0x0000_0004;

        /// `%T %V`: temporary directories.
        const TMP        = 0x0000_0008;
    }
}

impl Default for SystemSpecifiers {
    fn default() -> Self {
        Self::all()
    }
}

/// Build a specifier table containing the selected groups of system specifiers.
///
/// Applications usually extend the result with their own entries. Since the first matching entry
/// wins, entries pushed to the front override the standard ones.
pub fn standard_specifiers<'a, U: ?Sized>(which: SystemSpecifiers) -> Vec<Specifier<'a, U>> {
    let mut table = Vec::new();

    if which.contains(SystemSpecifiers::HOST) {
        table.extend([
            Specifier::new('H', &HostName),
            Specifier::new('l', &ShortHostName),
            Specifier::new('m', &MachineId),
            Specifier::new('b', &BootId),
            Specifier::new('v', &KernelRelease),
            Specifier::new('a', &Architecture),
        ]);
    }

    if which.contains(SystemSpecifiers::OS_RELEASE) {
        table.extend([
            Specifier::new('o', &OsReleaseField::ID),
            Specifier::new('w', &OsReleaseField::VERSION_ID),
            Specifier::new('B', &OsReleaseField::BUILD_ID),
            Specifier::new('W', &OsReleaseField::VARIANT_ID),
            Specifier::new('M', &OsReleaseField::IMAGE_ID),
            Specifier::new('A', &OsReleaseField::IMAGE_VERSION),
        ]);
    }

    if which.contains(SystemSpecifiers::USER) {
        table.extend([
            Specifier::new('u', &UserName),
            Specifier::new('U', &UserId),
            Specifier::new('g', &GroupName),
            Specifier::new('G', &GroupId),
            Specifier::new('h', &UserHome),
            Specifier::new('s', &UserShell),
        ]);
    }

    if which.contains(SystemSpecifiers::TMP) {
        table.extend([
            Specifier::new('T', &TmpDir),
            Specifier::new('V', &VarTmpDir),
        ]);
    }

    table
}
