mod error;
mod guard;
mod iter;
mod dyn_array;

pub use error::ArrayError;
pub use iter::{Iter, IterMut};
pub use dyn_array::DynArray;

pub type Result<T> = core::result::Result<T, ArrayError>;
