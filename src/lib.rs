//! Growable contiguous array with manual storage control.
//!
//! `dyn-array` provides [`DynArray<T>`], an ordered, index-addressable
//! element store that keeps capacity (allocated slots) and length (live
//! elements) strictly decoupled. Elements are constructed in place into raw
//! storage and dropped explicitly; the block itself is allocated and freed
//! separately from element lifetimes.
//!
//! # Key properties
//!
//! - **Fallible allocation**: every allocating operation returns
//!   [`Result`] with [`ArrayError`] instead of aborting; a failed growth
//!   leaves the array unchanged
//! - **Amortized doubling**: capacity grows `0 → 1 → 2 → 4 → ...`, only
//!   when an append finds the block full
//! - **Checked and unchecked access**: [`DynArray::at`] reports
//!   out-of-range and empty-array conditions to the caller;
//!   [`DynArray::get_unchecked`] is the zero-cost unsafe path
//! - **Whole-block moves**: moving an array transfers the storage block,
//!   never elements; copying produces an independent block trimmed to the
//!   source length
//!
//! # Example
//!
//! ```
//! use dyn_array::{ArrayError, DynArray};
//!
//! let mut primes: DynArray<u32> = DynArray::new();
//! for p in [2, 3, 5, 7] {
//!     primes.push(p)?;
//! }
//!
//! assert_eq!(primes.len(), 4);
//! assert_eq!(primes.capacity(), 4);
//! assert_eq!(primes[2], 5);
//! assert_eq!(
//!     primes.at(4),
//!     Err(ArrayError::OutOfRange { index: 4, len: 4 }),
//! );
//!
//! primes.remove_last_n(2);
//! assert_eq!(primes.as_slice(), &[2, 3]);
//! # Ok::<(), ArrayError>(())
//! ```
//!
//! # Non-goals
//!
//! The crate is not an allocator, not thread-safe beyond what `&mut`
//! exclusivity provides, and stores no zero-sized element types.

#![deny(missing_docs)]

mod array;
mod error;
mod iter;
mod raw;

pub use array::DynArray;
pub use error::ArrayError;
pub use iter::IntoIter;

#[cfg(test)]
mod tests;
