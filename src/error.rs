//! Common error handling stuff

#![allow(unused_macros)]
#![allow(unused_imports)]

/// Like failure's `format_err` but producing a `std::io::Error`.
macro_rules! io_format_err {
    ($($msg:tt)+) => {
        ::std::io::Error::new(::std::io::ErrorKind::Other, format!($($msg)+))
    };
}
pub(crate) use io_format_err;

/// Like failure's `bail` but producing a `std::io::Error`.
macro_rules! io_bail {
    ($($msg:tt)+) => {{
        return Err($crate::error::io_format_err!($($msg)+));
    }};
}
pub(crate) use io_bail;

/// Shortcut to return an `io::Error::last_os_error`.
macro_rules! io_bail_last {
    () => {
        return Err(::std::io::Error::last_os_error().into());
    };
}
pub(crate) use io_bail_last;

/// Shortcut to return an `io::Error` built from a raw `errno` value.
macro_rules! io_bail_errno {
    ($errno:expr) => {
        return Err(::std::io::Error::from_raw_os_error($errno).into());
    };
}
pub(crate) use io_bail_errno;
