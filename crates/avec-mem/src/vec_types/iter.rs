use core::{
    iter::FusedIterator,
    marker::PhantomData,
    ptr::NonNull,
};

/// Shared shape of [`Iter`] and [`IterMut`].
///
/// Counts the remaining elements instead of comparing pointers, so zero-sized
/// elements iterate like any other.
pub struct IterBase<T, Ref> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<Ref>,
}

pub type Iter<'a, T> = IterBase<T, &'a T>;
pub type IterMut<'a, T> = IterBase<T, &'a mut T>;

unsafe impl<T, Ref: Send> Send for IterBase<T, Ref> {}

unsafe impl<T, Ref: Sync> Sync for IterBase<T, Ref> {}

impl<T, Ref> IterBase<T, Ref> {

    /// # Safety
    /// `ptr` must point at `len` live values that outlive the iterator, and no
    /// other access may alias them while an [`IterMut`] exists.
    #[inline(always)]
    pub(crate) unsafe fn new(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    fn pop_front(&mut self) -> Option<NonNull<T>> {
        if self.len == 0 {
            return None
        }
        let item = self.ptr;
        self.ptr = unsafe { self.ptr.add(1) };
        self.len -= 1;
        Some(item)
    }

    #[inline(always)]
    fn pop_back(&mut self) -> Option<NonNull<T>> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.ptr.add(self.len) })
    }
}

impl<'a, T> Iterator for Iter<'a, T> {

    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_front().map(|ptr| unsafe { ptr.as_ref() })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {

    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.pop_back().map(|ptr| unsafe { ptr.as_ref() })
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {

    type Item = &'a mut T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_front().map(|mut ptr| unsafe { ptr.as_mut() })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {

    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.pop_back().map(|mut ptr| unsafe { ptr.as_mut() })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {

    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            ptr: self.ptr,
            len: self.len,
            _marker: PhantomData,
        }
    }
}
