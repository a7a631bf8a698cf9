use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::ArrayError;

/// Exclusively owned block of raw element storage.
///
/// Holds a pointer and a slot count, nothing else: the block is
/// uninitialized memory as far as this type is concerned. Whoever embeds a
/// `RawStorage` is responsible for constructing values into slots and
/// dropping them again before the storage goes away — dropping a
/// `RawStorage` frees the block without running any element destructors.
///
/// A capacity of zero means no allocation exists and the pointer is the
/// dangling sentinel.
#[derive(Debug)]
pub(crate) struct RawStorage<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> RawStorage<T> {
    /// Empty storage: capacity 0, no allocation.
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
        }
    }

    /// Allocates a block with room for `cap` elements.
    ///
    /// No elements are constructed. A `cap` of zero allocates nothing and
    /// returns the empty storage.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::AllocationFailed`] if the byte size of the
    /// block overflows or the allocator refuses the request. No partial
    /// state escapes on failure.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized. Zero-sized elements need no storage and
    /// are outside this container's scope.
    pub(crate) fn alloc(cap: usize) -> Result<Self, ArrayError> {
        assert!(
            size_of::<T>() != 0,
            "zero-sized element types are not supported",
        );
        if cap == 0 {
            return Ok(Self::empty());
        }

        let Ok(layout) = Layout::array::<T>(cap) else {
            return Err(ArrayError::AllocationFailed { requested: cap });
        };
        // SAFETY: layout is non-zero-sized (cap >= 1, T is not a ZST).
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).map_or(
            Err(ArrayError::AllocationFailed { requested: cap }),
            |ptr| Ok(Self { ptr, cap }),
        )
    }

    /// Number of element slots in the block.
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    /// Raw pointer to the first slot.
    ///
    /// Dangling (but well-aligned) when `capacity() == 0`.
    pub(crate) const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if self.cap == 0 {
            return;
        }
        let layout = Layout::array::<T>(self.cap).expect("layout validated at alloc");
        // SAFETY: the block was allocated with this exact layout and is
        // owned exclusively by this storage. Element destructors are the
        // embedder's responsibility and have already run (or the values
        // were moved out).
        unsafe {
            alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
        }
    }
}
