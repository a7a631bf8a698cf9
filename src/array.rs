use std::fmt;
use std::ptr;

use crate::raw::RawStorage;
use crate::{ArrayError, IntoIter};

/// Growable contiguous array with manual storage control.
///
/// Owns exactly one block of raw storage sized to its capacity and tracks
/// how many of the leading slots hold live values. Capacity and length are
/// decoupled: slots `[0, len)` are initialized, slots `[len, capacity)` are
/// raw memory that is never constructed or dropped implicitly, and
/// `capacity >= len` holds across every operation.
///
/// Unlike [`Vec`], every operation that may allocate is fallible and
/// returns [`ArrayError`] instead of aborting: a failed growth leaves the
/// array untouched, a failed constructor yields no instance. The std-style
/// trait impls ([`Clone`], [`Extend`], [`FromIterator`]) keep their
/// infallible signatures and panic on allocation failure.
///
/// Checked access goes through [`at`](Self::at) / [`at_mut`](Self::at_mut),
/// which distinguish an empty array from an out-of-range index. The
/// unchecked path is [`get_unchecked`](Self::get_unchecked).
///
/// # Example
///
/// ```
/// use dyn_array::DynArray;
///
/// let mut names: DynArray<String> = DynArray::new();
/// names.push(String::from("ada"))?;
/// names.push(String::from("grace"))?;
///
/// assert_eq!(names.len(), 2);
/// assert_eq!(names[1], "grace");
/// assert!(names.at(2).is_err());
/// # Ok::<(), dyn_array::ArrayError>(())
/// ```
///
/// # Limits
///
/// - Zero-sized element types are rejected (assertion at construction
///   time).
/// - No internal synchronization: concurrent mutation requires external
///   locking, which `&mut` exclusivity already enforces in safe code.
/// - References and iterators borrow the storage block; any mutation that
///   reallocates invalidates them, and the borrow checker rejects such use
///   at compile time.
pub struct DynArray<T> {
    pub(crate) storage: RawStorage<T>,
    pub(crate) len: usize,
}

// SAFETY: DynArray exclusively owns its storage block and hands out
// references only under the usual borrow rules, so sending or sharing the
// array is exactly as safe as sending or sharing the elements.
unsafe impl<T: Send> Send for DynArray<T> {}
unsafe impl<T: Sync> Sync for DynArray<T> {}

impl<T> DynArray<T> {
    /// Creates an empty array. No allocation.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized. Every constructor rejects zero-sized
    /// element types, so no instance can reach the storage arithmetic
    /// with a zero element size.
    #[must_use]
    pub const fn new() -> Self {
        assert!(
            size_of::<T>() != 0,
            "zero-sized element types are not supported",
        );
        Self {
            storage: RawStorage::empty(),
            len: 0,
        }
    }

    /// Creates an empty array backed by storage for `capacity` elements.
    ///
    /// No elements are constructed. A capacity of zero allocates nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the block cannot be
    /// allocated; no instance is produced, so a nonzero capacity can never
    /// be observed alongside a missing block.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Ok(Self {
            storage: RawStorage::alloc(capacity)?,
            len: 0,
        })
    }

    /// Creates an array holding a clone of every element of `values`, in
    /// order. The resulting capacity equals the slice length.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the block cannot be
    /// allocated.
    pub fn try_from_slice(values: &[T]) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self {
            storage: RawStorage::alloc(values.len())?,
            len: 0,
        };
        for value in values {
            // SAFETY: len < capacity, since the block was sized to the
            // whole slice. The slot is raw memory until this write.
            unsafe {
                array.storage.as_ptr().add(array.len).write(value.clone());
            }
            array.len += 1;
        }
        Ok(array)
    }

    /// Creates an array from an iterator with a known exact length,
    /// allocating exactly that many slots up front.
    ///
    /// Source order is preserved. If the iterator under-reports and yields
    /// fewer items, the array length is the number actually yielded; items
    /// past the reported length are not consumed.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the block cannot be
    /// allocated; no item is taken from the iterator in that case.
    pub fn try_from_iter<I>(iter: I) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = iter.into_iter();
        let count = items.len();
        let mut array = Self {
            storage: RawStorage::alloc(count)?,
            len: 0,
        };
        for value in items.take(count) {
            // SAFETY: take(count) bounds the loop to the allocated
            // capacity even if the iterator misreports its length.
            unsafe {
                array.storage.as_ptr().add(array.len).write(value);
            }
            array.len += 1;
        }
        Ok(array)
    }

    /// Returns an independent deep copy of the array.
    ///
    /// The copy's capacity equals its length; spare headroom in the source
    /// is deliberately not carried over.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the block cannot be
    /// allocated. The source is never affected.
    pub fn try_clone(&self) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::try_from_slice(self.as_slice())
    }

    /// Returns the number of live elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    ///
    /// Capacity may still be nonzero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots the storage block can hold without
    /// reallocation.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns a slice over the live elements.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialized. With len 0 the pointer is
        // the well-aligned dangling sentinel, which is valid for an empty
        // slice.
        unsafe { std::slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// Returns a mutable slice over the live elements.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: same as as_slice; &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.storage.as_ptr(), self.len) }
    }

    /// Returns a reference to the element at `index`, or `None` if the
    /// index is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns a mutable reference to the element at `index`, or `None` if
    /// the index is out of bounds.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Checked access distinguishing the two failure modes.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Empty`] when the array has no elements, and
    /// [`ArrayError::OutOfRange`] when `index >= len` on a nonempty array.
    /// `index == len` is always out of range, even with spare capacity
    /// behind it. No reference is produced when the check fails.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        self.check_index(index)?;
        // SAFETY: index < len, so the slot holds a live value.
        Ok(unsafe { &*self.storage.as_ptr().add(index) })
    }

    /// Mutable variant of [`at`](Self::at).
    ///
    /// # Errors
    ///
    /// Same conditions as [`at`](Self::at).
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        self.check_index(index)?;
        // SAFETY: index < len; &mut self guarantees exclusive access.
        Ok(unsafe { &mut *self.storage.as_ptr().add(index) })
    }

    const fn check_index(&self, index: usize) -> Result<(), ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::Empty);
        }
        if index >= self.len {
            return Err(ArrayError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Returns a reference to the element at `index` without any bounds
    /// check.
    ///
    /// # Safety
    ///
    /// The caller must guarantee `index < self.len()`.
    #[must_use]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        // SAFETY: caller guarantees index < len.
        unsafe { &*self.storage.as_ptr().add(index) }
    }

    /// Returns a mutable reference to the element at `index` without any
    /// bounds check.
    ///
    /// # Safety
    ///
    /// The caller must guarantee `index < self.len()`.
    #[must_use]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: caller guarantees index < len; &mut self guarantees
        // exclusive access.
        unsafe { &mut *self.storage.as_ptr().add(index) }
    }

    /// Appends `value`, growing the storage block if it is full.
    ///
    /// Amortized O(1); growth doubles the capacity (0 grows to 1).
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if growth was needed and
    /// the new block could not be allocated. The array is left unchanged
    /// and `value` is dropped.
    pub fn push(&mut self, value: T) -> Result<(), ArrayError> {
        self.push_with(|| value)?;
        Ok(())
    }

    /// Appends a value produced by `make`, written directly into the
    /// destination slot, and returns a reference to it.
    ///
    /// Growth happens before `make` runs, so a value is only produced once
    /// a slot for it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if growth was needed and
    /// the new block could not be allocated; `make` is not called.
    pub fn push_with<F>(&mut self, make: F) -> Result<&mut T, ArrayError>
    where
        F: FnOnce() -> T,
    {
        if self.len == self.storage.capacity() {
            self.grow()?;
        }
        // SAFETY: len < capacity after the growth check. The slot is raw
        // memory; write constructs the value in place. If make panics
        // nothing was written and len is unchanged.
        let slot = unsafe {
            let slot = self.storage.as_ptr().add(self.len);
            slot.write(make());
            &mut *slot
        };
        self.len += 1;
        Ok(slot)
    }

    /// Removes and returns the last element, or `None` if the array is
    /// empty. Never touches storage on an empty array.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot held a live value and is already outside the
        // live region, so it will not be dropped again.
        Some(unsafe { self.storage.as_ptr().add(self.len).read() })
    }

    /// Drops the trailing `count` elements, or all of them if `count`
    /// exceeds the length. Capacity and storage are retained.
    pub fn remove_last_n(&mut self, count: usize) {
        let old_len = self.len;
        let new_len = old_len.saturating_sub(count);
        // Length is cut before the destructors run so a panicking drop
        // cannot cause a double drop.
        self.len = new_len;
        for slot in (new_len..old_len).rev() {
            // SAFETY: slots [new_len, old_len) held live values and are
            // outside the live region now.
            unsafe {
                ptr::drop_in_place(self.storage.as_ptr().add(slot));
            }
        }
    }

    /// Appends a clone of every element of `other`, in order.
    ///
    /// Allocates one fresh block sized to the combined length, moves the
    /// receiver's elements into it and clones `other`'s after them; the
    /// resulting capacity equals the combined length. No-op when `other`
    /// is empty. `other` is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the combined block
    /// cannot be allocated; the receiver is left unchanged.
    pub fn concat(&mut self, other: &Self) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        if other.is_empty() {
            return Ok(());
        }
        let Some(total) = self.len.checked_add(other.len) else {
            return Err(ArrayError::AllocationFailed {
                requested: usize::MAX,
            });
        };
        self.relocate(RawStorage::alloc(total)?);
        for value in other.as_slice() {
            // SAFETY: len < total == capacity while elements of other
            // remain unappended.
            unsafe {
                self.storage.as_ptr().add(self.len).write(value.clone());
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Drops every element and releases the storage block, returning the
    /// array to the unallocated empty state (`capacity == 0`).
    ///
    /// Contrast with [`remove_last_n`](Self::remove_last_n), which keeps
    /// the block for reuse.
    pub fn clear(&mut self) {
        self.remove_last_n(self.len);
        self.storage = RawStorage::empty();
    }

    /// Grows the storage block to hold at least `capacity` elements.
    /// No-op when the current capacity is already sufficient.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the new block cannot be
    /// allocated; the array is left unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), ArrayError> {
        if capacity <= self.storage.capacity() {
            return Ok(());
        }
        self.relocate(RawStorage::alloc(capacity)?);
        Ok(())
    }

    /// Returns an iterator over the live elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a mutable iterator over the live elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Doubles the storage block (capacity 0 grows to 1).
    ///
    /// The new block is allocated before anything else happens, so a
    /// failure leaves the array byte-for-byte unchanged.
    fn grow(&mut self) -> Result<(), ArrayError> {
        let cap = self.storage.capacity();
        let new_cap = if cap == 0 { 1 } else { cap.saturating_mul(2) };
        self.relocate(RawStorage::alloc(new_cap)?);
        Ok(())
    }

    /// Moves the live elements into `new` and adopts it as the storage
    /// block. `new.capacity()` must be at least `self.len`.
    fn relocate(&mut self, new: RawStorage<T>) {
        debug_assert!(new.capacity() >= self.len);
        // SAFETY: both blocks hold at least len slots. The values are
        // moved bitwise; the old copies are abandoned, and the old block
        // is freed without running destructors on them.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), new.as_ptr(), self.len);
        }
        self.storage = new;
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        let len = self.len;
        self.len = 0;
        for slot in (0..len).rev() {
            // SAFETY: slots [0, len) held live values; each is dropped
            // exactly once. The block itself is freed by RawStorage.
            unsafe {
                ptr::drop_in_place(self.storage.as_ptr().add(slot));
            }
        }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        self.try_clone().expect("storage allocation failed")
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T> std::ops::Index<usize> for DynArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> std::ops::IndexMut<usize> for DynArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = Self::with_capacity(N).expect("storage allocation failed");
        for value in values {
            array
                .push(value)
                .expect("capacity reserved for all elements");
        }
        array
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value).expect("storage allocation failed");
        }
    }
}

impl<T> std::iter::FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}
