//! Temporary directories.

use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Environment variables consulted for a temporary directory, in order.
const TMP_VARS: [&str; 3] = ["TMPDIR", "TEMP", "TMP"];

/// Whether `path` is absolute and free of `.`/`..` components and duplicate slashes.
fn is_normalized_absolute(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains("//")
        && path.split('/').all(|component| component != "." && component != "..")
}

/// Find the temporary directory, using `env` to look up environment variables.
fn tmp_dir_with<F>(default: &str, env: F) -> String
where
    F: Fn(&str) -> Option<OsString>,
{
    for var in TMP_VARS {
        let Some(value) = env(var) else {
            continue;
        };
        let Some(value) = value.to_str() else {
            log::debug!("ignoring ${var}, not valid UTF-8");
            continue;
        };
        if !is_normalized_absolute(value) {
            log::debug!("ignoring ${var}={value:?}, not a normalized absolute path");
            continue;
        }
        if !Path::new(value).is_dir() {
            log::debug!("ignoring ${var}={value:?}, not a directory");
            continue;
        }
        return value.to_owned();
    }
    default.to_owned()
}

fn resolve_tmp_dir() -> io::Result<String> {
    Ok(tmp_dir_with("/tmp", |var| std::env::var_os(var)))
}

fn resolve_var_tmp_dir() -> io::Result<String> {
    Ok(tmp_dir_with("/var/tmp", |var| std::env::var_os(var)))
}

impl_resolve! {
    /// Resolves to `$TMPDIR`, `$TEMP` or `$TMP` if usable, `/tmp` otherwise.
    TmpDir => resolve_tmp_dir,

    /// Resolves to `$TMPDIR`, `$TEMP` or `$TMP` if usable, `/var/tmp` otherwise.
    VarTmpDir => resolve_var_tmp_dir,
}
