//! Escaping of literal `%` characters.

use super::Error;

/// Double every `%` in `s` so that it survives [`expand`](super::expand()) unchanged.
///
/// Fails with [`Error::OutOfMemory`] if the result cannot be allocated.
///
/// ```
/// # fn code() -> Result<(), specifier::Error> {
/// assert_eq!(specifier::escape("50% off")?, "50%% off");
/// #
/// # Ok(())
/// # }
/// # code().unwrap();
/// ```
pub fn escape(s: &str) -> Result<String, Error> {
    let mut out = String::new();
    out.try_reserve_exact(s.len() + s.bytes().filter(|&b| b == b'%').count())?;
    for c in s.chars() {
        if c == '%' {
            out.push('%');
        }
        out.push(c);
    }
    Ok(out)
}

/// Escape every string of a list, see [`escape`].
///
/// Order and count are preserved. An empty list produces an empty `Vec` without allocating.
pub fn escape_list<S: AsRef<str>>(strings: &[S]) -> Result<Vec<String>, Error> {
    let mut out = Vec::new();
    if strings.is_empty() {
        return Ok(out);
    }

    out.try_reserve_exact(strings.len())?;
    for s in strings {
        out.push(escape(s.as_ref())?);
    }
    Ok(out)
}
