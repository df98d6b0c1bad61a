use core::{error, fmt::Display};

use crate::Error;

/// Attaches context to the error of a `Result`, recording the caller.
pub trait Context<T> {

    #[track_caller]
    fn ctx_err<C>(self, ctx: C) -> Result<T, Error>
        where C: Display + Send + Sync + 'static;

    #[track_caller]
    fn ctx_err_with<C, F>(self, f: F) -> Result<T, Error>
        where
            C: Display + Send + Sync + 'static,
            F: FnOnce() -> C;
}

impl<T, E> Context<T> for Result<T, E>
    where
        E: error::Error + Send + Sync + 'static,
{

    #[track_caller]
    fn ctx_err<C>(self, ctx: C) -> Result<T, Error>
        where C: Display + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::new_internal(ctx, err, Some(caller!()))),
        }
    }

    #[track_caller]
    fn ctx_err_with<C, F>(self, f: F) -> Result<T, Error>
        where
            C: Display + Send + Sync + 'static,
            F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::new_internal(f(), err, Some(caller!()))),
        }
    }
}
