use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    mem::{self, ManuallyDrop, MaybeUninit},
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr::{self, NonNull},
    slice::{self, SliceIndex},
};

use crate::{
    element::{Element, TryDefault},
    errors::{CapacityError, ConstructError},
    raw_block::RawBlock,
};

use super::{
    guard::ConstructGuard,
    Iter,
    IterMut,
    Result,
};

/// A growable array owning one [`RawBlock`].
///
/// Slots `[0, len)` hold live values, the rest of the block is uninitialized.
/// Every fallible operation either succeeds or leaves the array as it found
/// it; the exceptions are spelled out on [`DynArray::assign_from`] and on
/// panicking moves of types with [`Element::NOTHROW_MOVE`] unset.
pub struct DynArray<T> {
    block: RawBlock<T>,
    len: usize,
    _marker: PhantomData<T>,
}

const_assert!(size_of!(DynArray<u32>) == size_of!(Option<DynArray<u32>>));

/// Builds a value into an uninitialized slot. On `Ok` the slot is live, on
/// `Err` it is not.
trait Construct<T>: FnOnce(&[T], NonNull<T>) -> core::result::Result<(), ConstructError> {}

impl<T, F> Construct<T> for F
    where
        F: FnOnce(&[T], NonNull<T>) -> core::result::Result<(), ConstructError>
{}

impl<T> DynArray<T> {

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            block: RawBlock::new(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// An empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            block: RawBlock::allocate(capacity)?,
            len: 0,
            _marker: PhantomData,
        })
    }

    /// An array of `len` default-constructed elements, with capacity `len`.
    ///
    /// If a default construction fails, every element built so far is
    /// destroyed in reverse order and the storage is released before the error
    /// is returned.
    pub fn with_len(len: usize) -> Result<Self>
        where
            T: TryDefault,
    {
        let block = RawBlock::allocate(len)?;
        let mut guard = ConstructGuard::new(block.as_non_null());
        for _ in 0..len {
            let value = T::try_default()?;
            unsafe { guard.write(value) }
        }
        let len = guard.disarm();
        Ok(Self {
            block,
            len,
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    /// Start of the storage, null when nothing is allocated.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.block.as_ptr()
    }

    /// Start of the storage, null when nothing is allocated.
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.block.as_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.block.as_non_null().as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.block.as_non_null().as_ptr(), self.len) }
    }

    /// # Safety
    /// `index` must be less than [`DynArray::len`].
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { self.block.slot(index).as_ref() }
    }

    /// # Safety
    /// `index` must be less than [`DynArray::len`].
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { self.block.slot(index).as_mut() }
    }

    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { Iter::new(self.block.as_non_null(), self.len) }
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe { IterMut::new(self.block.as_non_null(), self.len) }
    }

    /// Exchanges contents with `other` without touching any element.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        self.block.swap(&mut other.block);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Takes the contents out of `self`, leaving it empty without storage.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Removes the last element and hands it to the caller. `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.block.slot(self.len).read() })
    }

    /// Destroys the elements `[len, self.len())`. Capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return
        }
        let tail = self.len - len;
        self.len = len;
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.block.slot(len).as_ptr(),
                tail,
            ))
        }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Removes the element at `index`, shifting the rest left by one.
    ///
    /// # Panics
    /// If `index >= self.len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "removal index {} out of bounds for length {}", index, self.len);
        unsafe {
            let at = self.block.slot(index);
            let value = at.read();
            at.add(1).copy_to(at, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Destroys the element at `index`, shifting the rest left by one, and
    /// returns the index that now holds the element after it.
    ///
    /// `index == self.len()` erases nothing and returns `self.len()`.
    ///
    /// # Panics
    /// If `index > self.len()`.
    pub fn erase(&mut self, index: usize) -> usize {
        assert!(index <= self.len, "erase index {} out of bounds for length {}", index, self.len);
        if index == self.len {
            return index
        }
        drop(self.remove(index));
        index
    }
}

impl<T: Element> DynArray<T> {

    /// Whether reallocation transfers elements by [`Element::move_construct`]
    /// (`true`) or by [`Element::copy_construct`] (`false`).
    pub const TRANSFER_BY_MOVE: bool = T::NOTHROW_MOVE || !T::COPYABLE;

    /// Copies every element into a new array of capacity `self.len()`.
    ///
    /// `self` is never modified. If a copy fails, the copies made so far are
    /// destroyed before the error is returned.
    pub fn try_clone(&self) -> Result<Self> {
        let block = RawBlock::allocate(self.len)?;
        let mut guard = ConstructGuard::new(block.as_non_null());
        for value in self {
            let copy = value.copy_construct()?;
            unsafe { guard.write(copy) }
        }
        let len = guard.disarm();
        Ok(Self {
            block,
            len,
            _marker: PhantomData,
        })
    }

    /// Makes `self` element-wise equal to `rhs`.
    ///
    /// If `rhs` does not fit the current capacity a full copy is built first
    /// and swapped in, so failure leaves `self` untouched. Otherwise storage is
    /// reused: the shared prefix is copy-assigned in place and the length is
    /// adjusted. On that path a failed copy-assignment leaves the elements
    /// assigned so far in place, and a failed copy-construction of the tail
    /// destroys only the tail this call built.
    pub fn assign_from(&mut self, rhs: &Self) -> Result<()> {
        if rhs.len > self.capacity() {
            let mut copy = rhs.try_clone()?;
            self.swap(&mut copy);
            return Ok(())
        }
        let shared = self.len.min(rhs.len);
        for (dst, src) in self.as_mut_slice()[..shared].iter_mut().zip(rhs) {
            dst.copy_assign(src)?;
        }
        if rhs.len <= self.len {
            self.truncate(rhs.len);
            return Ok(())
        }
        let mut guard = ConstructGuard::new(unsafe { self.block.slot(self.len) });
        for value in &rhs.as_slice()[self.len..] {
            let copy = value.copy_construct()?;
            unsafe { guard.write(copy) }
        }
        self.len += guard.disarm();
        Ok(())
    }

    /// Grows capacity to exactly `new_capacity`. No-op if it already fits.
    ///
    /// On failure the array is unchanged.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.capacity() {
            return Ok(())
        }
        let len = self.len;
        let mut block = RawBlock::allocate(new_capacity)?;
        self.transfer_into(&block, None)?;
        self.block.swap(&mut block);
        self.len = len;
        Ok(())
    }

    /// Resizes to `len` elements, default-constructing new ones at the back
    /// or destroying the excess. Capacity never shrinks.
    pub fn resize(&mut self, len: usize) -> Result<()>
        where
            T: TryDefault,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(())
        }
        self.reserve(len)?;
        let mut guard = ConstructGuard::new(unsafe { self.block.slot(self.len) });
        for _ in self.len..len {
            let value = T::try_default()?;
            unsafe { guard.write(value) }
        }
        self.len += guard.disarm();
        Ok(())
    }

    /// Appends `value`, moving it into its slot with [`Element::move_construct`].
    pub fn push_back(&mut self, value: T) -> Result<&mut T> {
        self.construct_back(Self::construct_by_move(value))
    }

    /// Appends the value returned by `f`.
    ///
    /// `f` sees the current elements; they stay intact until the new value is
    /// in place, even when the array has to grow.
    pub fn emplace_back_with<F>(&mut self, f: F) -> Result<&mut T>
        where
            F: FnOnce(&[T]) -> core::result::Result<T, ConstructError>,
    {
        self.construct_back(Self::construct_with(f))
    }

    /// Appends a copy of the element at `index`.
    ///
    /// # Panics
    /// If `index >= self.len()`.
    pub fn push_back_copy(&mut self, index: usize) -> Result<&mut T> {
        assert!(index < self.len, "index {} out of bounds for length {}", index, self.len);
        self.emplace_back_with(|items| items[index].copy_construct())
    }

    /// Inserts `value` at `index`, shifting the rest right by one. Returns
    /// `index`.
    ///
    /// # Panics
    /// If `index > self.len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize> {
        self.construct_at(index, Self::construct_by_move(value))
    }

    /// Inserts the value returned by `f` at `index`, shifting the rest right
    /// by one. Returns `index`.
    ///
    /// `f` sees the current elements, and the new value is fully built before
    /// any of them is moved.
    ///
    /// # Panics
    /// If `index > self.len()`.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> Result<usize>
        where
            F: FnOnce(&[T]) -> core::result::Result<T, ConstructError>,
    {
        self.construct_at(index, Self::construct_with(f))
    }

    fn construct_by_move(value: T) -> impl Construct<T> {
        move |_: &[T], slot: NonNull<T>| -> core::result::Result<(), ConstructError> {
            let mut value = ManuallyDrop::new(value);
            unsafe { T::move_construct(NonNull::from(&mut *value), slot) }
            Ok(())
        }
    }

    fn construct_with<F>(f: F) -> impl Construct<T>
        where
            F: FnOnce(&[T]) -> core::result::Result<T, ConstructError>,
    {
        move |items: &[T], slot: NonNull<T>| -> core::result::Result<(), ConstructError> {
            let value = f(items)?;
            unsafe { slot.write(value) }
            Ok(())
        }
    }

    fn construct_back<C: Construct<T>>(&mut self, construct: C) -> Result<&mut T> {
        let index = self.len;
        self.construct_at(index, construct)?;
        Ok(unsafe { self.block.slot(index).as_mut() })
    }

    fn construct_at<C: Construct<T>>(&mut self, index: usize, construct: C) -> Result<usize> {
        let len = self.len;
        assert!(index <= len, "insertion index {} out of bounds for length {}", index, len);
        if len == self.capacity() {
            self.construct_realloc(index, construct)?;
        } else if index == len {
            construct(self.as_slice(), unsafe { self.block.slot(len) })?;
            self.len = len + 1;
        } else {
            let mut tmp = MaybeUninit::<T>::uninit();
            construct(self.as_slice(), NonNull::from(&mut tmp).cast())?;
            unsafe {
                self.len = len - 1;
                T::move_construct(self.block.slot(len - 1), self.block.slot(len));
                let at = self.block.slot(index);
                at.copy_to(at.add(1), len - 1 - index);
                at.write(tmp.assume_init());
            }
            self.len = len + 1;
        }
        Ok(index)
    }

    /// Builds the new element straight into its slot in a doubled block, then
    /// transfers the old elements around it.
    fn construct_realloc<C: Construct<T>>(&mut self, index: usize, construct: C) -> Result<()> {
        let len = self.len;
        let mut block = RawBlock::allocate(self.grown_capacity()?)?;
        let mut element = ConstructGuard::new(unsafe { block.slot(index) });
        construct(self.as_slice(), element.next_slot())?;
        unsafe { element.commit_one() }
        self.transfer_into(&block, Some(index))?;
        element.disarm();
        self.block.swap(&mut block);
        self.len = len + 1;
        Ok(())
    }

    fn grown_capacity(&self) -> Result<usize> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Ok(1)
        }
        capacity
            .checked_mul(2)
            .ok_or_else(|| CapacityError::MaxCapacityExceeded {
                max_capacity: RawBlock::<T>::max_capacity(),
            }.into())
    }

    /// Transfers all elements into `dst`, leaving a one slot hole at `gap`.
    ///
    /// On success `self.len` is zero and the old slots are dead; the caller
    /// swaps the blocks and restores the length. On failure `self` is
    /// untouched and nothing is left alive in `dst`.
    fn transfer_into(&mut self, dst: &RawBlock<T>, gap: Option<usize>) -> Result<()> {
        let len = self.len;
        let split = gap.unwrap_or(len);
        let tail_start = split + gap.is_some() as usize;
        debug_assert!(dst.capacity() >= len + gap.is_some() as usize);
        if Self::TRANSFER_BY_MOVE {
            self.len = 0;
            let src = self.block.as_non_null();
            let mut head = ConstructGuard::new(dst.as_non_null());
            for i in 0..split {
                unsafe {
                    T::move_construct(src.add(i), head.next_slot());
                    head.commit_one();
                }
            }
            let mut tail = ConstructGuard::new(unsafe { dst.slot(tail_start) });
            for i in split..len {
                unsafe {
                    T::move_construct(src.add(i), tail.next_slot());
                    tail.commit_one();
                }
            }
            tail.disarm();
            head.disarm();
        } else {
            let items = self.as_slice();
            let mut head = ConstructGuard::new(dst.as_non_null());
            for value in &items[..split] {
                let copy = value.copy_construct()?;
                unsafe { head.write(copy) }
            }
            let mut tail = ConstructGuard::new(unsafe { dst.slot(tail_start) });
            for value in &items[split..] {
                let copy = value.copy_construct()?;
                unsafe { tail.write(copy) }
            }
            tail.disarm();
            head.disarm();
            self.clear();
        }
        Ok(())
    }
}

impl<T> Drop for DynArray<T> {

    fn drop(&mut self) {
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynArray<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I> Index<I> for DynArray<T>
    where
        I: SliceIndex<[T]>,
{

    type Output = I::Output;

    #[inline(always)]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I> IndexMut<I> for DynArray<T>
    where
        I: SliceIndex<[T]>,
{

    #[inline(always)]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T> Deref for DynArray<T> {

    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {

    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {

    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {

    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {

    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {

    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {

    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for DynArray<T> {

    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<[T]> for DynArray<T> {

    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Debug> Debug for DynArray<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::{ArrayError, ConstructKind};

    #[derive(Debug, PartialEq)]
    struct Flaky {
        value: i32,
        fail_copy: bool,
    }

    impl Flaky {

        fn new(value: i32) -> Self {
            Self {
                value,
                fail_copy: false,
            }
        }
    }

    unsafe impl Element for Flaky {

        const NOTHROW_MOVE: bool = false;
        const COPYABLE: bool = true;

        fn copy_construct(&self) -> core::result::Result<Self, ConstructError> {
            if self.fail_copy {
                return Err(ConstructError::new(ConstructKind::Copy, "flaky copy"))
            }
            Ok(Self::new(self.value))
        }
    }

    fn flaky(n: i32) -> DynArray<Flaky> {
        let mut array = DynArray::with_capacity(n as usize).unwrap();
        for i in 0..n {
            array.push_back(Flaky::new(i)).unwrap();
        }
        array
    }

    fn ints(values: &[i32]) -> DynArray<i32> {
        let mut array = DynArray::new();
        for &v in values {
            array.push_back(v).unwrap();
        }
        array
    }

    #[test]
    fn test_new_is_empty() {
        let array = DynArray::<i32>::new();
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 0);
        assert!(array.is_empty());
        assert!(array.as_ptr().is_null());
        assert_eq!(array.iter().count(), 0);
    }

    #[test]
    fn test_with_len_default_constructs() {
        let array = DynArray::<i32>::with_len(100).unwrap();
        assert_eq!(array.len(), 100);
        assert_eq!(array.capacity(), 100);
        assert!(array.iter().all(|&v| v == 0));
        assert_eq!(unsafe { array.as_ptr().add(10) }, &array[10] as *const i32);
    }

    #[test]
    fn test_reserve() {
        let mut array = DynArray::<String>::with_len(3).unwrap();
        array[1] = "one".into();
        array.reserve(2).unwrap();
        assert_eq!(array.capacity(), 3);
        array.reserve(10).unwrap();
        assert_eq!(array.capacity(), 10);
        assert_eq!(array.len(), 3);
        assert_eq!(array[1], "one");
    }

    #[test]
    fn test_push_back_doubles_capacity() {
        let mut array = DynArray::new();
        let mut capacities = Vec::new();
        for i in 0..9 {
            array.push_back(i).unwrap();
            capacities.push(array.capacity());
        }
        assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(array, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_push_back_returns_new_element() {
        let mut array = DynArray::new();
        *array.push_back(1).unwrap() += 10;
        assert_eq!(array, [11]);
    }

    #[test]
    fn test_push_back_copy_of_own_element_at_full_capacity() {
        let mut array = DynArray::new();
        array.push_back(String::from("self")).unwrap();
        assert_eq!(array.len(), array.capacity());
        array.push_back_copy(0).unwrap();
        assert_eq!(array.capacity(), 2);
        assert_eq!(array[0], "self");
        assert_eq!(array[1], "self");
    }

    #[test]
    fn test_emplace_reads_elements_before_growing() {
        let mut array = ints(&[3, 4]);
        assert_eq!(array.capacity(), 2);
        array.emplace_back_with(|items| Ok(items.iter().sum())).unwrap();
        assert_eq!(array, [3, 4, 7]);
        array.emplace_with(0, |items| Ok(items[2] * 2)).unwrap();
        assert_eq!(array, [14, 3, 4, 7]);
    }

    #[test]
    fn test_pop_back() {
        let mut array = ints(&[1, 2]);
        assert_eq!(array.pop_back(), Some(2));
        assert_eq!(array.pop_back(), Some(1));
        assert_eq!(array.pop_back(), None);
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 2);
    }

    #[test]
    fn test_insert_within_capacity() {
        let mut array = ints(&[1, 2, 4]);
        array.reserve(8).unwrap();
        assert_eq!(array.insert(2, 3).unwrap(), 2);
        assert_eq!(array, [1, 2, 3, 4]);
        assert_eq!(array.insert(0, 0).unwrap(), 0);
        assert_eq!(array.insert(5, 5).unwrap(), 5);
        assert_eq!(array, [0, 1, 2, 3, 4, 5]);
        assert_eq!(array.capacity(), 8);
    }

    #[test]
    fn test_insert_with_reallocation() {
        let mut array = ints(&[1, 2, 3, 4]);
        assert_eq!(array.capacity(), 4);
        array.insert(1, 10).unwrap();
        assert_eq!(array.capacity(), 8);
        assert_eq!(array, [1, 10, 2, 3, 4]);
    }

    #[test]
    fn test_insert_strings_keeps_order() {
        let mut array = DynArray::new();
        for s in ["a", "c", "d"] {
            array.push_back(String::from(s)).unwrap();
        }
        array.insert(1, String::from("b")).unwrap();
        array.insert(4, String::from("e")).unwrap();
        let joined: Vec<&str> = array.iter().map(String::as_str).collect();
        assert_eq!(joined, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    #[should_panic]
    fn test_insert_past_end_panics() {
        let mut array = ints(&[1]);
        let _ = array.insert(2, 0);
    }

    #[test]
    fn test_erase() {
        let mut array = ints(&[1, 2, 3, 4]);
        assert_eq!(array.erase(1), 1);
        assert_eq!(array, [1, 3, 4]);
        assert_eq!(array.erase(3), 3);
        assert_eq!(array.erase(2), 2);
        assert_eq!(array, [1, 3]);
        assert_eq!(array.capacity(), 4);
        let mut empty = DynArray::<i32>::new();
        assert_eq!(empty.erase(0), 0);
    }

    #[test]
    fn test_remove_returns_element() {
        let mut array = DynArray::new();
        for s in ["x", "y", "z"] {
            array.push_back(String::from(s)).unwrap();
        }
        assert_eq!(array.remove(0), "x");
        assert_eq!(array.remove(1), "z");
        assert_eq!(array, [String::from("y")]);
    }

    #[test]
    fn test_resize() {
        let mut array = DynArray::<i32>::new();
        array.resize(5).unwrap();
        assert_eq!(array.len(), 5);
        assert_eq!(array.capacity(), 5);
        array[4] = 4;
        array.resize(2).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 5);
        array.resize(4).unwrap();
        assert_eq!(array, [0, 0, 0, 0]);
        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 5);
    }

    #[test]
    fn test_swap_and_take() {
        let mut a = ints(&[1, 2, 3]);
        let mut b = DynArray::with_capacity(10).unwrap();
        a.swap(&mut b);
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), 10);
        assert_eq!(b, [1, 2, 3]);
        let c = b.take();
        assert_eq!(b.capacity(), 0);
        assert_eq!(c, [1, 2, 3]);
    }

    #[test]
    fn test_try_clone_is_independent() {
        let a = ints(&[5, 6, 7]);
        let b = a.try_clone().unwrap();
        assert_eq!(a, b);
        assert_eq!(b.capacity(), 3);
        assert_ne!(&a[0] as *const i32, &b[0] as *const i32);
    }

    #[test]
    fn test_assign_from() {
        let source = ints(&[1, 2, 3]);
        let mut larger = DynArray::<i32>::with_len(10).unwrap();
        larger.assign_from(&source).unwrap();
        assert_eq!(larger, source);
        assert_eq!(larger.capacity(), 10);

        let mut smaller = ints(&[9]);
        smaller.reserve(4).unwrap();
        smaller.assign_from(&source).unwrap();
        assert_eq!(smaller, source);
        assert_eq!(smaller.capacity(), 4);

        let mut tiny = ints(&[9]);
        tiny.assign_from(&source).unwrap();
        assert_eq!(tiny, source);
        assert_eq!(tiny.capacity(), 3);
    }

    #[test]
    fn test_failed_copy_reserve_is_rolled_back() {
        assert!(!DynArray::<Flaky>::TRANSFER_BY_MOVE);
        let mut array = flaky(4);
        array[3].fail_copy = true;
        let before = array.as_ptr();
        let err = array.reserve(8).unwrap_err();
        assert_eq!(err.construct_error().map(|e| e.kind), Some(ConstructKind::Copy));
        assert_eq!(array.len(), 4);
        assert_eq!(array.capacity(), 4);
        assert_eq!(array.as_ptr(), before);
        assert!(array.iter().enumerate().all(|(i, v)| v.value == i as i32));
    }

    #[test]
    fn test_failed_copy_during_growing_insert_is_rolled_back() {
        let mut array = flaky(2);
        array[0].fail_copy = true;
        assert!(array.insert(1, Flaky::new(100)).is_err());
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 2);
        assert_eq!(array[1].value, 1);
    }

    #[test]
    fn test_failed_emplace_leaves_array_unchanged() {
        let mut array = ints(&[1, 2, 3]);
        array.reserve(4).unwrap();
        let err = array
            .emplace_with(1, |_| Err(ConstructError::new(ConstructKind::Emplace, "refused")))
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::Construct(ConstructError::new(ConstructKind::Emplace, "refused")),
        );
        assert_eq!(array, [1, 2, 3]);
    }

    #[test]
    fn test_try_clone_failure_leaves_source() {
        let mut array = flaky(3);
        array[2].fail_copy = true;
        assert!(array.try_clone().is_err());
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut array = DynArray::<()>::new();
        for _ in 0..5 {
            array.push_back(()).unwrap();
        }
        assert_eq!(array.len(), 5);
        assert_eq!(array.iter().count(), 5);
        assert_eq!(array.pop_back(), Some(()));
        array.insert(0, ()).unwrap();
        assert_eq!(array.len(), 5);
    }

    #[test]
    fn test_iteration() {
        let mut array = ints(&[1, 2, 3, 4]);
        for v in &mut array {
            *v *= 10;
        }
        let forward: Vec<i32> = array.iter().copied().collect();
        let backward: Vec<i32> = array.iter().rev().copied().collect();
        assert_eq!(forward, [10, 20, 30, 40]);
        assert_eq!(backward, [40, 30, 20, 10]);
        let mut iter = array.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&10));
        assert_eq!(iter.next_back(), Some(&40));
        assert_eq!(iter.len(), 2);
        assert_eq!(array.iter().sum::<i32>(), 100);
    }

    #[test]
    fn test_debug_lists_elements() {
        assert_eq!(format!("{:?}", ints(&[1, 2])), "[1, 2]");
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let array = ints(&[1]);
        let value = array[1];
        assert_eq!(value, 0);
    }
}
