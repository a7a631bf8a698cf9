/// Failure conditions reported by the fallible [`DynArray`](crate::DynArray)
/// operations.
///
/// Allocation failures always leave the array in the well-defined state
/// documented on the operation that reported them: constructors yield no
/// instance, growth leaves the array untouched. Access failures never hand
/// back a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    /// The allocator could not satisfy a storage request, or the byte size
    /// of the requested block overflowed.
    #[error("allocation of storage for {requested} elements failed")]
    AllocationFailed {
        /// Number of element slots that were requested.
        requested: usize,
    },

    /// A checked access used an index at or past the current length.
    ///
    /// `index == len` (one past the end) is always out of range, even when
    /// spare capacity exists behind it.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// Array length at the time of the access.
        len: usize,
    },

    /// A checked access was attempted on an array with no elements.
    #[error("array is empty")]
    Empty,
}
