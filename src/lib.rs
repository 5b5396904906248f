//! # `%x` style specifier expansion
//!
//! Service managers allow configuration strings to refer to properties of the running system via
//! short two character tokens: `%H` for the host name, `%m` for the machine ID, `%u` for the user
//! name and so on. This crate provides the engine expanding such strings, and (with the `system`
//! feature, enabled by default) the resolvers querying the usual system properties.
//!
//! # The expansion engine
//!
//! A specifier table maps single characters to resolvers. The text is scanned exactly once:
//!
//! - `%%` produces a literal `%`.
//! - `%c` with a resolver for `c` in the table is replaced with the resolver's output.
//! - `%c` where `c` is an ASCII letter or digit without a resolver is an error.
//! - `%c` for any other `c` is left as is, so the same string may carry unrelated `%` sequences.
//! - A single trailing `%` is kept.
//!
//! ```
//! # fn code() -> Result<(), specifier::Error> {
//! use specifier::{Literal, Specifier, expand};
//!
//! let table: [Specifier<()>; 2] = [
//!     Specifier::new('n', &Literal("getty")),
//!     Specifier::new('i', &Literal("tty1")),
//! ];
//!
//! let expanded = expand("%n@%i.service uses 100%% of %-", &table, &())?;
//! assert_eq!(expanded, "getty@tty1.service uses 100% of %-");
//! #
//! # Ok(())
//! # }
//! # code().unwrap();
//! ```
//!
//! # System specifiers:
//!
//! ``` rust, no_run
//! # fn code() -> Result<(), specifier::Error> {
//! use specifier::expand;
//! use specifier::system::{SystemSpecifiers, standard_specifiers};
//!
//! let table = standard_specifiers::<()>(SystemSpecifiers::HOST | SystemSpecifiers::USER);
//! println!("{}", expand("%u@%H (%a, kernel %v)", &table, &())?);
//! #
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(missing_docs)]

// BEGIN internal helpers

pub(crate) mod error;

// END internal helpers

pub mod specifier;
#[doc(inline)]
pub use specifier::{Error, Literal, Resolve, Specifier, escape, escape_list, expand};

#[cfg(feature = "system")]
pub mod system;
