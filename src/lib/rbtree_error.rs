use thiserror::Error;

/// Errors reported by [`RBTreeMap`](crate::RBTreeMap).
///
/// Missing keys and duplicate inserts are not errors; those come back as
/// `bool` or `Option` results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The start index passed to `copy_to` lies past the end of the destination.
    #[error("index {index} is out of range for a destination of length {len}")]
    IndexOutOfRange {
        /// Requested start index.
        index: usize,
        /// Length of the destination slice.
        len: usize,
    },
    /// The destination has fewer free slots after the start index than the map has entries.
    #[error("destination is not large enough: {needed} entries needed, {available} available")]
    DestinationTooSmall {
        /// Number of entries in the map.
        needed: usize,
        /// Slots available from the start index onward.
        available: usize,
    },
    /// The structural validator found a broken red-black or ordering invariant.
    #[error("red-black invariant violated: {0}")]
    InvariantViolated(String),
}
