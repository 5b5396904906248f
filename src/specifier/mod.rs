//! The specifier table types and the expansion engine.

use std::collections::TryReserveError;
use std::fmt;
use std::io;

mod escape;
pub use escape::{escape, escape_list};

mod expand;
pub use expand::expand;

/// Returns whether `c` belongs to the pool of characters usable as specifiers.
///
/// Escape sequences with such a character *must* be resolvable, all others are passed through
/// verbatim.
pub const fn is_reserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '%'
}

/// Errors produced while expanding specifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Growing the output buffer failed.
    #[error("out of memory while expanding specifiers")]
    OutOfMemory(#[from] TryReserveError),

    /// A reserved specifier character has no resolver in the table.
    #[error("unknown specifier '%{0}'")]
    BadSpecifier(char),

    /// The resolver for a specifier failed.
    #[error("failed to resolve specifier '%{specifier}'")]
    ResolverFailed {
        /// The specifier character being resolved.
        specifier: char,
        /// The error returned by the resolver.
        #[source]
        source: io::Error,
    },
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::OutOfMemory(_) => io::Error::new(io::ErrorKind::OutOfMemory, err),
            Error::BadSpecifier(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::ResolverFailed { source, .. } => source,
        }
    }
}

/// Computes the replacement value for a specifier.
///
/// Any `Fn(char, &U) -> io::Result<String> + Sync` is a resolver. Resolvers needing additional
/// context carry it themselves, see [`Literal`].
///
/// Resolvers are `Sync`, so one table can be used by several threads at once.
pub trait Resolve<U: ?Sized>: Sync {
    /// Produce the replacement for `specifier`.
    ///
    /// `userdata` is whatever was passed to [`expand`], unmodified.
    fn resolve(&self, specifier: char, userdata: &U) -> io::Result<String>;
}

impl<U, F> Resolve<U> for F
where
    U: ?Sized,
    F: Fn(char, &U) -> io::Result<String> + Sync,
{
    fn resolve(&self, specifier: char, userdata: &U) -> io::Result<String> {
        self(specifier, userdata)
    }
}

/// A resolver always producing the same string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Literal<'a>(pub &'a str);

impl<U: ?Sized> Resolve<U> for Literal<'_> {
    fn resolve(&self, _specifier: char, _userdata: &U) -> io::Result<String> {
        Ok(self.0.to_owned())
    }
}

/// An entry of a specifier table.
///
/// Tables are plain slices. When a character appears more than once, the first entry wins.
pub struct Specifier<'a, U: ?Sized> {
    specifier: char,
    lookup: Option<&'a dyn Resolve<U>>,
}

impl<'a, U: ?Sized> Specifier<'a, U> {
    /// Bind `specifier` to a resolver.
    pub const fn new(specifier: char, lookup: &'a dyn Resolve<U>) -> Self {
        Self {
            specifier,
            lookup: Some(lookup),
        }
    }

    /// Mark `specifier` as known but not implemented.
    ///
    /// Expanding it fails with [`Error::BadSpecifier`] if the character is in the reserved pool,
    /// otherwise it is passed through like a character missing from the table.
    pub const fn reserved(specifier: char) -> Self {
        Self {
            specifier,
            lookup: None,
        }
    }

    /// The specifier character.
    pub const fn specifier(&self) -> char {
        self.specifier
    }

    /// The resolver, if any.
    pub fn lookup(&self) -> Option<&'a dyn Resolve<U>> {
        self.lookup
    }
}

impl<U: ?Sized> Clone for Specifier<'_, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: ?Sized> Copy for Specifier<'_, U> {}

impl<U: ?Sized> fmt::Debug for Specifier<'_, U> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Specifier")
            .field("specifier", &self.specifier)
            .field("resolvable", &self.lookup.is_some())
            .finish()
    }
}

/// Find the resolver for `c`, honoring the first matching entry only.
pub(crate) fn lookup<'a, U: ?Sized>(
    table: &[Specifier<'a, U>],
    c: char,
) -> Option<&'a dyn Resolve<U>> {
    table
        .iter()
        .find(|entry| entry.specifier == c)
        .and_then(|entry| entry.lookup)
}
