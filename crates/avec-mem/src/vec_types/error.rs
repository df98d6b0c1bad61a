use avec_proc::Error;

use crate::errors::{CapacityError, ConstructError};

/// Failure of a [`DynArray`](super::DynArray) operation.
///
/// Whichever variant is returned, the array is left as it was before the call,
/// except where an operation documents otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[display("{0}")]
    Capacity(#[from] #[source] CapacityError),
    #[display("{0}")]
    Construct(#[from] #[source] ConstructError),
}

impl ArrayError {

    /// The constructor failure behind this error, if any.
    #[inline(always)]
    pub fn construct_error(&self) -> Option<&ConstructError> {
        match self {
            Self::Construct(err) => Some(err),
            Self::Capacity(_) => None,
        }
    }
}
