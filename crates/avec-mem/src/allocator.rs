use core::{
    alloc::Layout,
    ptr::NonNull,
};

/// Source of raw, untyped memory.
pub trait Allocator {

    /// # Safety
    /// `layout` must have a non-zero size.
    unsafe fn allocate_raw(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// # Safety
    /// `ptr` must have been returned by [`Allocator::allocate_raw`] on `self`
    /// with the same `layout`, and not freed since.
    unsafe fn free_raw(&self, ptr: NonNull<u8>, layout: Layout);

    /// # Safety
    /// Same as [`Allocator::allocate_raw`]. `layout` should describe an array of `T`.
    unsafe fn allocate_uninit<T>(&self, layout: Layout) -> Option<NonNull<T>> {
        unsafe { self.allocate_raw(layout).map(|ptr| ptr.cast::<T>()) }
    }

    /// # Safety
    /// Same as [`Allocator::free_raw`].
    unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, layout: Layout) {
        unsafe { self.free_raw(ptr.cast::<u8>(), layout) }
    }
}
