//! Growable arrays built directly on raw, untyped memory blocks.
//!
//! [`RawBlock`] owns uninitialized storage and nothing else. [`DynArray`] owns
//! one block and drives every element lifecycle event over it: construction,
//! copy, move and destruction, rolling back partially applied bulk operations
//! when an element constructor fails.

#[macro_use]
mod macros;

pub mod element;
pub mod raw_block;
pub mod vec_types;

mod errors;
mod allocator;
mod global_alloc;

pub use errors::{CapacityError, ConstructError, ConstructKind};
pub use allocator::Allocator;
pub use global_alloc::{GlobalAlloc, GLOBAL_ALLOC};
pub use element::{Element, TryDefault};
pub use raw_block::RawBlock;
pub use vec_types::{ArrayError, DynArray, Iter, IterMut};
