//! Lifecycle capabilities of array elements.
//!
//! Rust moves are bitwise and cannot fail, so most types only need the
//! defaults of [`Element`]. Types that want their moves and copies to be
//! observable, or whose copies can fail, override the hooks.

use core::ptr::NonNull;

use crate::errors::{ConstructError, ConstructKind};

/// Construction forms [`DynArray`](crate::DynArray) uses when it relocates,
/// copies and assigns elements.
///
/// Whether a reallocation transfers elements by move or by copy is decided
/// statically from [`Element::NOTHROW_MOVE`] and [`Element::COPYABLE`]: moves
/// are used when they cannot fail or when copying is impossible, copies
/// otherwise, so that a failed copy leaves the original elements in place.
///
/// # Safety
/// [`Element::move_construct`] must leave `dst` holding a live value and `src`
/// dead (either relocated bitwise or destroyed in place). If it unwinds, `dst`
/// must not hold a live value; `src` is then treated as dead and never
/// touched again.
pub unsafe trait Element: Sized {

    /// `true` when [`Element::move_construct`] cannot fail.
    const NOTHROW_MOVE: bool = true;

    /// `true` when [`Element::copy_construct`] is supported.
    const COPYABLE: bool = false;

    /// Moves the live value at `src` into the uninitialized slot `dst`.
    ///
    /// # Safety
    /// `src` must hold a live value, `dst` must be valid for writes and the two
    /// must not overlap.
    #[inline(always)]
    unsafe fn move_construct(src: NonNull<Self>, dst: NonNull<Self>) {
        unsafe { src.copy_to_nonoverlapping(dst, 1) }
    }

    /// Copy-constructs a new value. Only called when [`Element::COPYABLE`] is `true`.
    fn copy_construct(&self) -> Result<Self, ConstructError> {
        Err(ConstructError::new(ConstructKind::Copy, "element is not copyable"))
    }

    /// Assigns a copy of `src` to an already live value.
    fn copy_assign(&mut self, src: &Self) -> Result<(), ConstructError> {
        *self = src.copy_construct()?;
        Ok(())
    }
}

/// Default construction that may fail.
pub trait TryDefault: Sized {

    fn try_default() -> Result<Self, ConstructError>;
}

impl_element!(
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64, bool, char, (),
    String,
);
