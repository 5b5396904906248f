//! The single pass expansion of specifier strings.

use super::{Error, Specifier, is_reserved, lookup};

/// The output buffer of an expansion.
///
/// The capacity always covers the output produced so far plus the unscanned rest of the input,
/// so copying literal characters never reallocates. Only splicing in a replacement grows it.
pub(crate) struct ExpansionBuffer {
    buf: String,
}

impl ExpansionBuffer {
    /// Create a buffer large enough to hold `text_len` bytes of unmodified text.
    pub(crate) fn new(text_len: usize) -> Result<Self, Error> {
        let mut buf = String::new();
        buf.try_reserve_exact(text_len)?;
        Ok(Self { buf })
    }

    /// Copy a literal character.
    ///
    /// Every literal character corresponds to at least as many bytes of consumed input, so this
    /// stays within the reserved capacity.
    pub(crate) fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    /// Append a replacement, making sure the `remaining` bytes of input still fit afterwards.
    pub(crate) fn splice(&mut self, value: &str, remaining: usize) -> Result<(), Error> {
        self.buf.try_reserve(value.len().saturating_add(remaining))?;
        self.buf.push_str(value);
        Ok(())
    }

    /// Hand out the final string, releasing unused capacity.
    pub(crate) fn finish(mut self) -> String {
        self.buf.shrink_to_fit();
        self.buf
    }
}

/// Expand all specifiers in `text` using `table`.
///
/// `userdata` is passed to every resolver invoked. Each occurrence of a specifier invokes its
/// resolver again, results are not cached.
///
/// The first failing resolver or unresolvable reserved specifier aborts the expansion, no partial
/// output is returned.
///
/// ```
/// # use std::io;
/// use specifier::{Error, Specifier, expand};
///
/// let upper = |c: char, name: &str| -> io::Result<String> {
///     Ok(match c {
///         'N' => name.to_uppercase(),
///         _ => name.to_owned(),
///     })
/// };
/// let table: [Specifier<str>; 2] = [Specifier::new('n', &upper), Specifier::new('N', &upper)];
///
/// assert_eq!(expand("%n/%N", &table, "foo").unwrap(), "foo/FOO");
/// assert!(matches!(expand("%x", &table, "foo"), Err(Error::BadSpecifier('x'))));
/// ```
pub fn expand<U: ?Sized>(
    text: &str,
    table: &[Specifier<'_, U>],
    userdata: &U,
) -> Result<String, Error> {
    let mut out = ExpansionBuffer::new(text.len())?;
    let mut percent = false;

    for (at, c) in text.char_indices() {
        if !percent {
            if c == '%' {
                percent = true;
            } else {
                out.push(c);
            }
            continue;
        }

        percent = false;

        if c == '%' {
            out.push('%');
            continue;
        }

        match lookup(table, c) {
            Some(resolver) => {
                let value = resolver.resolve(c, userdata).map_err(|source| {
                    log::debug!("failed to resolve specifier '%{c}': {source}");
                    Error::ResolverFailed {
                        specifier: c,
                        source,
                    }
                })?;
                let remaining = text.len() - at - c.len_utf8();
                out.splice(&value, remaining)?;
            }
            None if is_reserved(c) => {
                log::debug!("unknown specifier '%{c}' in {text:?}");
                return Err(Error::BadSpecifier(c));
            }
            None => {
                out.push('%');
                out.push(c);
            }
        }
    }

    // a stray '%' at the very end stays
    if percent {
        out.push('%');
    }

    Ok(out.finish())
}
