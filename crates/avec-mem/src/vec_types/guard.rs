use core::ptr::NonNull;

/// Tracks values constructed one by one into consecutive slots starting at
/// `base`.
///
/// Dropping an armed guard destroys every tracked value in reverse order of
/// construction. That covers both early `Err` returns and unwinding out of an
/// element constructor. [`ConstructGuard::disarm`] commits the values.
pub(super) struct ConstructGuard<T> {
    base: NonNull<T>,
    len: usize,
}

impl<T> ConstructGuard<T> {

    #[inline(always)]
    pub fn new(base: NonNull<T>) -> Self {
        Self {
            base,
            len: 0,
        }
    }

    /// Next uninitialized slot.
    #[inline(always)]
    pub fn next_slot(&self) -> NonNull<T> {
        unsafe { self.base.add(self.len) }
    }

    /// Counts the value just constructed in [`ConstructGuard::next_slot`].
    #[inline(always)]
    pub unsafe fn commit_one(&mut self) {
        self.len += 1;
    }

    /// # Safety
    /// The next slot must be valid for writes.
    #[inline(always)]
    pub unsafe fn write(&mut self, value: T) {
        unsafe {
            self.next_slot().write(value);
            self.commit_one();
        }
    }

    /// Releases ownership of the tracked values, returning how many there are.
    #[inline(always)]
    pub fn disarm(self) -> usize {
        let len = self.len;
        core::mem::forget(self);
        len
    }
}

impl<T> Drop for ConstructGuard<T> {

    fn drop(&mut self) {
        while self.len != 0 {
            self.len -= 1;
            unsafe { self.base.add(self.len).drop_in_place() }
        }
    }
}
