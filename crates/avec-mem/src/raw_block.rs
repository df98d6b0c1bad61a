use core::{
    alloc::Layout,
    fmt::{self, Debug, Formatter},
    mem,
    ptr::{self, NonNull},
};

use crate::{
    allocator::Allocator,
    errors::CapacityError,
    global_alloc::GLOBAL_ALLOC,
};

/// Uninitialized storage for `capacity` values of `T`.
///
/// A block never constructs or destroys elements, it only hands out slot
/// addresses. Which slots hold live values is the owner's business, and the
/// owner must destroy them before the block is released.
///
/// Blocks can be moved, swapped or taken, never copied: the storage always has
/// exactly one owner.
pub struct RawBlock<T> {
    data: NonNull<T>,
    capacity: usize,
}

unsafe impl<T: Send> Send for RawBlock<T> {}

unsafe impl<T: Sync> Sync for RawBlock<T> {}

impl<T> RawBlock<T> {

    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty block without storage.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Acquires storage for `capacity` elements, none of them initialized.
    ///
    /// A zero capacity yields an empty block without touching the allocator, and
    /// so does a zero-sized `T`, which reports the requested capacity.
    pub fn allocate(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Ok(Self::new())
        }
        if Self::IS_ZST {
            return Ok(Self {
                data: NonNull::dangling(),
                capacity,
            })
        }
        let layout = Self::layout(capacity)?;
        let data = unsafe { GLOBAL_ALLOC.allocate_uninit::<T>(layout) }
            .ok_or(CapacityError::AllocFailed { new_capacity: capacity })?;
        Ok(Self {
            data,
            capacity,
        })
    }

    /// Largest capacity a block of `T` can be allocated with.
    #[inline(always)]
    pub const fn max_capacity() -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            isize::MAX as usize / mem::size_of::<T>()
        }
    }

    fn layout(capacity: usize) -> Result<Layout, CapacityError> {
        Layout::array::<T>(capacity)
            .map_err(|_| CapacityError::MaxCapacityExceeded {
                max_capacity: Self::max_capacity(),
            })
    }

    /// Releases the storage and leaves the block empty. No-op on an empty block.
    ///
    /// Every live value in the block must have been destroyed or moved out.
    pub fn deallocate(&mut self) {
        if self.capacity != 0 && !Self::IS_ZST {
            if let Ok(layout) = Self::layout(self.capacity) {
                unsafe { GLOBAL_ALLOC.free_uninit(self.data, layout) }
            }
        }
        self.data = NonNull::dangling();
        self.capacity = 0;
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start of the storage, `None` when nothing is allocated.
    #[inline(always)]
    pub fn address(&self) -> Option<NonNull<T>> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.data)
        }
    }

    /// Start of the storage, null when nothing is allocated.
    #[inline(always)]
    pub fn as_ptr(&self) -> *mut T {
        self.address()
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Start of the storage, dangling when nothing is allocated.
    #[inline(always)]
    pub fn as_non_null(&self) -> NonNull<T> {
        self.data
    }

    /// Address of slot `index`.
    ///
    /// # Safety
    /// `index` must not exceed [`RawBlock::capacity`]. The one-past-the-end slot
    /// is only good for address arithmetic.
    #[inline(always)]
    pub unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(
            index <= self.capacity,
            "slot {} out of bounds of capacity {}", index, self.capacity,
        );
        unsafe { self.data.add(index) }
    }

    /// Exchanges storage and capacity with `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.data, &mut other.data);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Takes the storage out of `self`, leaving it empty.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T> Default for RawBlock<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBlock<T> {

    fn drop(&mut self) {
        self.deallocate();
    }
}

impl<T> Debug for RawBlock<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBlock")
            .field("address", &self.as_ptr())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_empty_block_has_no_storage() {
        let block = RawBlock::<u64>::new();
        assert_eq!(block.capacity(), 0);
        assert!(block.address().is_none());
        assert!(block.as_ptr().is_null());
        let block = RawBlock::<u64>::allocate(0).unwrap();
        assert_eq!(block.capacity(), 0);
        assert!(block.as_ptr().is_null());
    }

    #[test]
    fn test_slots_are_contiguous() {
        let block = RawBlock::<u64>::allocate(16).unwrap();
        assert_eq!(block.capacity(), 16);
        let base = block.as_ptr() as usize;
        unsafe {
            assert_eq!(block.slot(0).as_ptr() as usize, base);
            assert_eq!(block.slot(3).as_ptr() as usize - base, 3 * size_of::<u64>());
            assert_eq!(block.slot(16).as_ptr() as usize - base, 16 * size_of::<u64>());
        }
    }

    #[test]
    fn test_slots_hold_written_values() {
        let block = RawBlock::<u32>::allocate(4).unwrap();
        unsafe {
            for i in 0..4 {
                block.slot(i).write(i as u32 * 10);
            }
            for i in 0..4 {
                assert_eq!(block.slot(i).read(), i as u32 * 10);
            }
        }
    }

    #[test]
    fn test_swap_exchanges_storage() {
        let mut a = RawBlock::<u8>::allocate(8).unwrap();
        let mut b = RawBlock::<u8>::new();
        let addr = a.as_ptr();
        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert!(a.as_ptr().is_null());
        assert_eq!(b.capacity(), 8);
        assert_eq!(b.as_ptr(), addr);
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut a = RawBlock::<String>::allocate(3).unwrap();
        let addr = a.as_ptr();
        let b = a.take();
        assert_eq!(a.capacity(), 0);
        assert!(a.address().is_none());
        assert_eq!(b.capacity(), 3);
        assert_eq!(b.as_ptr(), addr);
    }

    #[test]
    fn test_deallocate_is_repeatable() {
        let mut block = RawBlock::<u16>::allocate(5).unwrap();
        block.deallocate();
        assert_eq!(block.capacity(), 0);
        block.deallocate();
        assert!(block.as_ptr().is_null());
    }

    #[test]
    fn test_oversized_request_fails() {
        let err = RawBlock::<u64>::allocate(usize::MAX).unwrap_err();
        assert_eq!(err, CapacityError::MaxCapacityExceeded {
            max_capacity: RawBlock::<u64>::max_capacity(),
        });
    }

    #[test]
    fn test_zero_sized_elements_never_allocate() {
        let block = RawBlock::<()>::allocate(10).unwrap();
        assert_eq!(block.capacity(), 10);
        assert_eq!(block.as_non_null(), NonNull::dangling());
    }
}
