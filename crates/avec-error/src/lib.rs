//! Context-carrying errors for applications built on the avec crates.

#[macro_use]
pub mod location;
mod tracked;
mod error;
mod context;

pub use location::Location;
pub use tracked::Tracked;
pub use error::Error;
pub use context::Context;

pub use avec_proc::{Display, Error};

pub type Result<T> = core::result::Result<T, Error>;

/// Returns a tracked [`Error`] from the enclosing function unless `cond` holds.
///
/// ```
/// fn check(len: usize) -> avec_error::Result<()> {
///     avec_error::ensure!(len < 4, "length {} too large", len);
///     Ok(())
/// }
/// assert!(check(2).is_ok());
/// assert_eq!(check(9).unwrap_err().to_string(), "length 9 too large");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::Error::just_context_tracked(format!($($arg)+)).into())
        }
    };
}
