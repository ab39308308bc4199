//! In-memory N-dimensional array engine.
//!
//! `ndcore` stores homogeneous element data in one contiguous row-major buffer
//! and layers shape bookkeeping, bounds-checked indexing, reshape, slicing and
//! broadcast validation on top of it.
//!
//! # Core Types
//!
//! - [`Shape`]: the `(rows, cols)` extent of an array
//! - [`NdArray`]: an owning array or a non-owning view over caller memory
//! - [`Ownership`]: the explicit `Copy` / `View` policy used when wrapping a buffer
//! - [`Slice`]: `start:stop:step` selection along one axis
//!
//! # Dimensionality
//!
//! Every array is addressed as a 2D grid. An N-dimensional request such as
//! `[2, 3, 4]` is folded into `Shape(6, 4)`: all leading dimensions collapse
//! into `rows` and the trailing dimension becomes `cols`. The flat offset of
//! `(row, col)` is always `row * cols + col`. Callers that address more than
//! two logical axes compute offsets with [`row_major_strides`].
//!
//! # Example
//!
//! ```rust
//! use ndcore::{nested, NdArray, Shape};
//!
//! let mut a = NdArray::from_nested(nested![[1, 2, 3], [4, 5, 6]]).unwrap();
//! assert_eq!(a.shape(), Shape::new(2, 3));
//! assert_eq!(a.at2(1, 0).unwrap(), 4);
//!
//! // Reshape reinterprets the buffer without moving data.
//! a.reshape(Shape::new(3, 2)).unwrap();
//! assert_eq!(a.at2(1, 0).unwrap(), 3);
//! assert_eq!(a.at(3).unwrap(), 4);
//! ```
//!
//! # Views
//!
//! ```rust
//! use ndcore::{NdArray, Ownership, Shape};
//!
//! let mut buffer = vec![0.0f64; 6];
//! {
//!     let mut view =
//!         NdArray::from_buffer(&mut buffer, Shape::new(2, 3), Ownership::View).unwrap();
//!     view.set2(1, 2, 9.0).unwrap();
//! }
//! assert_eq!(buffer[5], 9.0);
//! ```

mod array;
mod broadcast;
mod info;
mod layout;
mod nested;
mod ops;
mod persist;
mod shape;
mod slice;
mod storage;

pub use array::{array_equal, NdArray};
pub use broadcast::{broadcast_dims, broadcast_shape, zip_map};
pub use info::Info;
pub use layout::RawLayout;
pub use nested::Nested;
pub use persist::{fromfile, load, read_binary};
pub use shape::{row_major_strides, Shape};
pub use slice::{Slice, SliceRange};
pub use storage::Ownership;

pub use ndcore_traits::{DtypeInfo, Element, ElementKind, Numeric, Persist};

// ============================================================================
// Constants
// ============================================================================

/// Leading bytes of every file written by [`NdArray::dump`].
pub const DUMP_MAGIC: [u8; 4] = *b"NDC1";

/// Extension appended by [`NdArray::dump`] when the path has none.
pub const DEFAULT_BINARY_EXTENSION: &str = "bin";

/// Extension appended by [`NdArray::tofile`] in text mode when the path has none.
pub const DEFAULT_TEXT_EXTENSION: &str = "txt";

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during array operations.
#[derive(Debug, thiserror::Error)]
pub enum NdError {
    /// Malformed shape request (empty dimension list, size overflow).
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Element counts or broadcast shapes are incompatible.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Index outside the valid range of an axis.
    #[error("index {index} is out of bounds for {axis} of length {len}")]
    IndexError {
        index: isize,
        axis: &'static str,
        len: usize,
    },

    /// Caller input that violates an operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing buffer could not be allocated.
    #[error("failed to allocate storage for {elements} elements")]
    AllocationError { elements: usize },

    /// Reading or writing a persisted array failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Persisted data does not describe a valid array.
    #[error("malformed array data: {0}")]
    Format(String),
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, NdError>;
