use std::mem::ManuallyDrop;
use std::ptr;

use crate::DynArray;
use crate::raw::RawStorage;

/// Consuming iterator over a [`DynArray`], yielding owned elements in
/// order.
///
/// Created by the by-value [`IntoIterator`] impl. Takes over the storage
/// block wholesale; elements not yielded by the time the iterator is
/// dropped are dropped with it, then the block is freed.
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    start: *const T,
    end: *const T,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(array: DynArray<T>) -> Self {
        let array = ManuallyDrop::new(array);
        // SAFETY: the array is wrapped in ManuallyDrop, so ownership of
        // the storage moves here exactly once and the array's own drop
        // never runs.
        let storage = unsafe { ptr::read(&array.storage) };
        let start = storage.as_ptr().cast_const();
        // SAFETY: len <= capacity; one-past-the-end stays in bounds of the
        // allocation (or equals the dangling sentinel for len 0).
        let end = unsafe { start.add(array.len) };
        Self { storage, start, end }
    }

    fn remaining(&self) -> usize {
        // Element types are never zero-sized (every DynArray constructor
        // rejects them), so the division is well-defined.
        (self.end as usize - self.start as usize) / size_of::<T>()
    }

    /// Returns the elements not yet yielded as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) covers exactly the live, unyielded values.
        unsafe { std::slice::from_raw_parts(self.start, self.remaining()) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: start < end, so start points at a live value; advancing
        // the cursor takes the slot out of the range, so the value is read
        // exactly once.
        let value = unsafe { self.start.read() };
        // SAFETY: start < end keeps the increment within the allocation.
        self.start = unsafe { self.start.add(1) };
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: start < end, so the slot before end holds a live value;
        // retreating the cursor takes the slot out of the range.
        self.end = unsafe { self.end.sub(1) };
        // SAFETY: end now points at that live value.
        Some(unsafe { self.end.read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> std::iter::FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Elements never yielded still need their destructors before the
        // block is freed by the storage's own drop.
        while let Some(value) = self.next() {
            drop(value);
        }
    }
}

// SAFETY: the iterator exclusively owns the storage block and the
// unyielded values — the same ownership story as DynArray itself.
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}
