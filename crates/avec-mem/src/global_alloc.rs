use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::Allocator;

/// The system allocator.
pub struct GlobalAlloc;

pub static GLOBAL_ALLOC: GlobalAlloc = GlobalAlloc;

impl Allocator for GlobalAlloc {

    unsafe fn allocate_raw(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None
        }
        NonNull::new(unsafe { alloc(layout) })
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return
        }
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}
