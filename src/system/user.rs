//! The calling user and group.
//!
//! For UID/GID 0 and 65534 no user database lookups happen, as NSS must not be used from PID 1.

use std::ffi::{CStr, OsString, c_char};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStringExt;
use std::path::Path;

use crate::error::{io_bail, io_bail_errno};

/// Upper bound for the `getpw*_r`/`getgr*_r` scratch buffer.
const MAX_BUFFER: usize = 1 << 20;

/// A `passwd` database entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Passwd {
    /// Login name.
    pub name: String,
    /// Home directory.
    pub dir: String,
    /// Login shell.
    pub shell: String,
}

/// Look up a user by ID, `None` if there is no such user.
pub fn passwd_by_uid(uid: libc::uid_t) -> io::Result<Option<Passwd>> {
    let mut buf = vec![0 as c_char; initial_buffer_size(libc::_SC_GETPW_R_SIZE_MAX)];
    loop {
        let mut pwd = MaybeUninit::<libc::passwd>::uninit();
        let mut result = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(uid, pwd.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE {
            grow(&mut buf)?;
            continue;
        }
        if rc != 0 {
            io_bail_errno!(rc);
        }
        if result.is_null() {
            return Ok(None);
        }

        let pwd = unsafe { pwd.assume_init() };
        return Ok(Some(unsafe {
            Passwd {
                name: owned_c_str(pwd.pw_name),
                dir: owned_c_str(pwd.pw_dir),
                shell: owned_c_str(pwd.pw_shell),
            }
        }));
    }
}

/// Look up a group name by ID, `None` if there is no such group.
pub fn group_name_by_gid(gid: libc::gid_t) -> io::Result<Option<String>> {
    let mut buf = vec![0 as c_char; initial_buffer_size(libc::_SC_GETGR_R_SIZE_MAX)];
    loop {
        let mut grp = MaybeUninit::<libc::group>::uninit();
        let mut result = std::ptr::null_mut();
        let rc = unsafe {
            libc::getgrgid_r(gid, grp.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE {
            grow(&mut buf)?;
            continue;
        }
        if rc != 0 {
            io_bail_errno!(rc);
        }
        if result.is_null() {
            return Ok(None);
        }

        let grp = unsafe { grp.assume_init() };
        return Ok(Some(unsafe { owned_c_str(grp.gr_name) }));
    }
}

fn initial_buffer_size(name: libc::c_int) -> usize {
    match unsafe { libc::sysconf(name) } {
        n if n > 0 => n as usize,
        _ => 1024,
    }
}

fn grow(buf: &mut Vec<c_char>) -> io::Result<()> {
    let len = buf.len() * 2;
    if len > MAX_BUFFER {
        io_bail!("user database entry exceeds {MAX_BUFFER} bytes");
    }
    buf.resize(len, 0);
    Ok(())
}

/// # Safety
///
/// `ptr` must be null or point to a valid nul terminated string.
unsafe fn owned_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

/// UID and GID of the overflow user and group, named without consulting NSS.
const NOBODY_ID: u32 = 65534;

/// Name an ID with `lookup`, falling back to the decimal ID when there is no name.
///
/// Lookup errors count as "no name".
fn name_or_number<F>(id: u32, lookup: F) -> String
where
    F: FnOnce(u32) -> io::Result<Option<String>>,
{
    match id {
        0 => return "root".to_owned(),
        NOBODY_ID => return "nobody".to_owned(),
        _ => {}
    }
    match lookup(id) {
        Ok(Some(name)) => name,
        Ok(None) => id.to_string(),
        Err(err) => {
            log::debug!("name lookup for {id} failed, using the number: {err}");
            id.to_string()
        }
    }
}

fn uid_to_name(uid: libc::uid_t) -> String {
    name_or_number(uid, |uid| Ok(passwd_by_uid(uid)?.map(|pwd| pwd.name)))
}

fn gid_to_name(gid: libc::gid_t) -> String {
    name_or_number(gid, group_name_by_gid)
}

/// Accept an environment override only if it is a valid UTF-8 absolute path.
fn env_path(var: &str, value: Option<OsString>) -> Option<String> {
    let value = value?;
    match String::from_utf8(value.into_vec()) {
        Ok(value) if Path::new(&value).is_absolute() => Some(value),
        Ok(value) => {
            log::debug!("ignoring ${var}={value:?}, not an absolute path");
            None
        }
        Err(_) => {
            log::debug!("ignoring ${var}, not valid UTF-8");
            None
        }
    }
}

/// Prefer the environment override, then the fixed value for root, then the passwd field.
fn user_path(var: &str, root_default: &str, field: fn(Passwd) -> String) -> io::Result<String> {
    if let Some(path) = env_path(var, std::env::var_os(var)) {
        return Ok(path);
    }

    let uid = unsafe { libc::getuid() };
    if uid == 0 {
        return Ok(root_default.to_owned());
    }

    let Some(pwd) = passwd_by_uid(uid)? else {
        io_bail_errno!(libc::ESRCH);
    };
    checked_user_path(var, uid, field(pwd))
}

/// Reject a passwd path that is not absolute with `EINVAL`.
fn checked_user_path(var: &str, uid: libc::uid_t, path: String) -> io::Result<String> {
    if !Path::new(&path).is_absolute() {
        log::debug!("user database entry for {uid} has an invalid ${var} path {path:?}");
        io_bail_errno!(libc::EINVAL);
    }
    Ok(path)
}

fn resolve_user_name() -> io::Result<String> {
    // $USER is not consulted, the name always matches %U
    Ok(uid_to_name(unsafe { libc::getuid() }))
}

fn resolve_user_id() -> io::Result<String> {
    Ok(unsafe { libc::getuid() }.to_string())
}

fn resolve_group_name() -> io::Result<String> {
    Ok(gid_to_name(unsafe { libc::getgid() }))
}

fn resolve_group_id() -> io::Result<String> {
    Ok(unsafe { libc::getgid() }.to_string())
}

fn resolve_user_home() -> io::Result<String> {
    user_path("HOME", "/root", |pwd| pwd.dir)
}

fn resolve_user_shell() -> io::Result<String> {
    user_path("SHELL", "/bin/sh", |pwd| pwd.shell)
}

impl_resolve! {
    /// Resolves to the name of the real user, or the numeric ID if it has none.
    UserName => resolve_user_name,

    /// Resolves to the real user ID.
    UserId => resolve_user_id,

    /// Resolves to the name of the real group, or the numeric ID if it has none.
    GroupName => resolve_group_name,

    /// Resolves to the real group ID.
    GroupId => resolve_group_id,

    /// Resolves to the home directory of the real user.
    ///
    /// `$HOME` takes precedence when it is an absolute path.
    UserHome => resolve_user_home,

    /// Resolves to the login shell of the real user.
    ///
    /// `$SHELL` takes precedence when it is an absolute path.
    UserShell => resolve_user_shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_names() {
        assert_eq!(uid_to_name(0), "root");
        assert_eq!(gid_to_name(0), "root");
        assert_eq!(uid_to_name(NOBODY_ID), "nobody");
        assert_eq!(gid_to_name(NOBODY_ID), "nobody");
        assert_eq!(
            name_or_number(NOBODY_ID, |_| panic!("nobody must not be looked up")),
            "nobody"
        );
    }

    #[test]
    fn unknown_ids_are_numeric() {
        // (uid_t)-2 is never allocated
        assert_eq!(uid_to_name(4294967294), "4294967294");
        assert_eq!(gid_to_name(4294967294), "4294967294");
    }

    #[test]
    fn lookup_errors_are_numeric() {
        let failing = |_| Err(io::Error::from_raw_os_error(libc::ENOENT));
        assert_eq!(name_or_number(1001, failing), "1001");
        let failing = |_| Err(io::Error::from_raw_os_error(libc::EPERM));
        assert_eq!(name_or_number(42, failing), "42");
        assert_eq!(
            name_or_number(1000, |_| Ok(Some("user".to_owned()))),
            "user"
        );
        assert_eq!(name_or_number(1000, |_| Ok(None)), "1000");
    }

    #[test]
    fn relative_passwd_paths() {
        let err = checked_user_path("HOME", 1000, "home/user".to_owned()).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
        let err = checked_user_path("SHELL", 1000, String::new()).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
        assert_eq!(
            checked_user_path("SHELL", 1000, "/bin/bash".to_owned()).unwrap(),
            "/bin/bash"
        );
    }

    #[test]
    fn environment_paths() {
        assert_eq!(env_path("HOME", None), None);
        assert_eq!(
            env_path("HOME", Some("/home/user".into())),
            Some("/home/user".to_owned())
        );
        assert_eq!(env_path("HOME", Some("relative/home".into())), None);
        assert_eq!(env_path("HOME", Some("".into())), None);
        assert_eq!(
            env_path("SHELL", Some(OsString::from_vec(vec![b'/', 0xff]))),
            None
        );
    }

    #[test]
    fn current_user() {
        let uid = unsafe { libc::getuid() };
        let name = resolve_user_name().unwrap();
        assert!(!name.is_empty());
        if uid == 0 {
            assert_eq!(name, "root");
        }
        assert_eq!(resolve_user_id().unwrap(), uid.to_string());
    }
}
