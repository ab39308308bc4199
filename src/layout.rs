//! Raw buffer access for foreign interop.
//!
//! Native libraries that consume row-major matrices (BLAS-style APIs, image
//! buffers, other array types) need a pointer, an element count and strides.
//! [`RawLayout`] bundles those; [`NdArray::from_raw_parts`] goes the other
//! way and wraps foreign memory as a view without copying.

use ndcore_traits::Element;

use crate::array::NdArray;
use crate::shape::Shape;
use crate::storage::Storage;
use crate::{NdError, Result};

/// Memory description of an array's buffer.
///
/// The buffer is always contiguous and row-major: `col_stride == 1` and
/// `row_stride == cols`, both in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLayout<T> {
    pub ptr: *const T,
    pub len: usize,
    pub rows: usize,
    pub cols: usize,
    pub row_stride: isize,
    pub col_stride: isize,
    pub elem_size: usize,
}

impl<T> RawLayout<T> {
    /// Strides in bytes instead of elements.
    #[inline]
    pub fn byte_strides(&self) -> [isize; 2] {
        let elem = self.elem_size as isize;
        [self.row_stride * elem, self.col_stride * elem]
    }

    /// Total size of the buffer in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.len * self.elem_size
    }
}

impl<'a, T: Element> NdArray<'a, T> {
    /// Raw const pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    /// Raw mutable pointer to the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.as_mut_slice().as_mut_ptr()
    }

    /// Pointer, length and strides of the buffer.
    ///
    /// The pointer is valid while `self` is alive and not moved or resized.
    pub fn raw_layout(&self) -> RawLayout<T> {
        let [row_stride, col_stride] = self.strides();
        RawLayout {
            ptr: self.as_ptr(),
            len: self.size(),
            rows: self.num_rows(),
            cols: self.num_cols(),
            row_stride,
            col_stride,
            elem_size: std::mem::size_of::<T>(),
        }
    }

    /// Wrap foreign memory as a non-owning view, without copying.
    ///
    /// # Errors
    /// `InvalidShape` if `rows * cols` overflows; `InvalidArgument` if `ptr`
    /// is null for a non-empty shape.
    ///
    /// # Safety
    /// For the whole lifetime `'a` the caller must guarantee that `ptr` is
    /// aligned, points to at least `rows * cols` initialized elements, and is
    /// not accessed through any other pointer while the view is alive.
    /// Violating this is undefined behaviour; it is not reported as an error.
    pub unsafe fn from_raw_parts(ptr: *mut T, shape: Shape) -> Result<Self> {
        let size = shape.size()?;
        if size == 0 {
            return Ok(Self::from_storage(shape, 0, Storage::View(&mut [])));
        }
        if ptr.is_null() {
            return Err(NdError::InvalidArgument(
                "null pointer passed for a non-empty shape".into(),
            ));
        }
        let data = std::slice::from_raw_parts_mut(ptr, size);
        Ok(Self::from_storage(shape, size, Storage::View(data)))
    }
}
