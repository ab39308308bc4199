//! The `NdArray` container.
//!
//! An `NdArray` is a [`Shape`] plus one contiguous row-major buffer holding
//! exactly `rows * cols` elements. The buffer is either owned by the array or
//! borrowed from the caller (a view); see [`Ownership`].
//!
//! Copying is always explicit: [`NdArray::view_mut`] aliases the same buffer,
//! [`NdArray::deep_copy`] duplicates it. `NdArray` does not implement `Clone`.

use std::fmt;
use std::ops::{Index, IndexMut};

use ndcore_traits::Element;

use crate::shape::Shape;
use crate::storage::{allocate, allocate_from_slice, Ownership, Storage};
use crate::{NdError, Result};

/// Homogeneous 2D-addressed array over a contiguous buffer.
///
/// # Type Parameters
/// - `'a`: Lifetime of borrowed storage (`'static` for owning arrays)
/// - `T`: Element type
pub struct NdArray<'a, T> {
    shape: Shape,
    size: usize,
    storage: Storage<'a, T>,
}

impl<T: fmt::Debug> fmt::Debug for NdArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("shape", &self.shape)
            .field("ownership", &self.storage.ownership())
            .field("data", &self.storage.as_slice())
            .finish()
    }
}

pub(crate) fn index_error(index: usize, axis: &'static str, len: usize) -> NdError {
    NdError::IndexError {
        index: isize::try_from(index).unwrap_or(isize::MAX),
        axis,
        len,
    }
}

// ============================================================================
// Construction
// ============================================================================

impl<T: Element> NdArray<'static, T> {
    /// Create a `rows x cols` array filled with `T::default()`.
    ///
    /// # Errors
    /// `InvalidShape` if `rows * cols` overflows, `AllocationError` if the
    /// buffer cannot be allocated.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::from_shape(Shape::new(rows, cols))
    }

    /// Create a `size x size` array filled with `T::default()`.
    pub fn square(size: usize) -> Result<Self> {
        Self::from_shape(Shape::square(size))
    }

    /// Create an array of the given shape filled with `T::default()`.
    pub fn from_shape(shape: Shape) -> Result<Self> {
        let size = shape.size()?;
        let data = allocate(size, T::default())?;
        Ok(Self::from_storage(shape, size, Storage::Owned(data)))
    }

    /// Create an array from a list of dimension sizes, folded by
    /// [`Shape::from_dims`].
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        Self::from_shape(Shape::from_dims(dims)?)
    }

    /// Take ownership of `data` as a `(1, n)` row vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        let size = data.len();
        Self::from_storage(Shape::new(1, size), size, Storage::Owned(data))
    }

    /// Take ownership of `data` laid out row-major under `shape`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `data.len()` differs from the shape's size.
    pub fn from_shape_vec(shape: Shape, data: Vec<T>) -> Result<Self> {
        let size = shape.size()?;
        if data.len() != size {
            return Err(NdError::ShapeMismatch(format!(
                "{} elements cannot fill shape {shape} ({size} elements)",
                data.len()
            )));
        }
        Ok(Self::from_storage(shape, size, Storage::Owned(data)))
    }

    /// Build a 2D array from rows of equal length.
    ///
    /// # Errors
    /// `InvalidArgument` if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(NdError::InvalidArgument(format!(
                "all rows need the same number of elements: row 0 has {cols}, row {r} has {}",
                row.len()
            )));
        }
        let shape = Shape::new(rows.len(), cols);
        let size = shape.size()?;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| NdError::AllocationError { elements: size })?;
        for row in rows {
            data.extend(row);
        }
        Ok(Self::from_storage(shape, size, Storage::Owned(data)))
    }

    /// Create an array whose element at `(row, col)` is `f(row, col)`.
    ///
    /// `f` is called in row-major order.
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        let size = shape.size()?;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| NdError::AllocationError { elements: size })?;
        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                data.push(f(row, col));
            }
        }
        Ok(Self::from_storage(shape, size, Storage::Owned(data)))
    }

    /// Deep-copy the first `rows * cols` elements of `src`.
    pub fn copy_from_slice(src: &[T], shape: Shape) -> Result<Self> {
        let size = shape.size()?;
        check_buffer_len(src.len(), shape, size)?;
        let data = allocate_from_slice(&src[..size])?;
        Ok(Self::from_storage(shape, size, Storage::Owned(data)))
    }
}

fn check_buffer_len(len: usize, shape: Shape, size: usize) -> Result<()> {
    if len < size {
        return Err(NdError::ShapeMismatch(format!(
            "buffer of {len} elements cannot back shape {shape} ({size} elements)"
        )));
    }
    Ok(())
}

impl<'a, T: Element> NdArray<'a, T> {
    #[inline]
    pub(crate) fn from_storage(shape: Shape, size: usize, storage: Storage<'a, T>) -> Self {
        debug_assert_eq!(storage.as_slice().len(), size);
        Self {
            shape,
            size,
            storage,
        }
    }

    /// Wrap a caller-supplied buffer under an explicit ownership policy.
    ///
    /// - [`Ownership::Copy`] duplicates `rows * cols` elements; the buffer is
    ///   not touched afterwards.
    /// - [`Ownership::View`] borrows the first `rows * cols` elements; writes
    ///   through the array land in `buffer`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `buffer` holds fewer than `rows * cols` elements.
    pub fn from_buffer(buffer: &'a mut [T], shape: Shape, policy: Ownership) -> Result<Self> {
        let size = shape.size()?;
        check_buffer_len(buffer.len(), shape, size)?;
        let storage = match policy {
            Ownership::Copy => Storage::Owned(allocate_from_slice(&buffer[..size])?),
            Ownership::View => Storage::View(&mut buffer[..size]),
        };
        Ok(Self::from_storage(shape, size, storage))
    }

    // ========================================================================
    // Shape queries
    // ========================================================================

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.shape.rows()
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.shape.cols()
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of bytes held by the element buffer.
    #[inline]
    pub fn nbytes(&self) -> usize {
        self.size * std::mem::size_of::<T>()
    }

    /// `Copy` for arrays that own their buffer, `View` for borrowed ones.
    #[inline]
    pub fn ownership(&self) -> Ownership {
        self.storage.ownership()
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        self.ownership() == Ownership::View
    }

    /// Row-major element strides `[cols, 1]`.
    #[inline]
    pub fn strides(&self) -> [isize; 2] {
        self.shape.strides()
    }

    /// Reinterpret the buffer under a new shape of equal size.
    ///
    /// Only the shape changes; elements keep their flat offsets.
    ///
    /// # Errors
    /// `ShapeMismatch` if the sizes differ. The array is left unchanged.
    pub fn reshape(&mut self, shape: Shape) -> Result<()> {
        let new_size = shape.size()?;
        if new_size != self.size {
            return Err(NdError::ShapeMismatch(format!(
                "cannot reshape array of size {} into shape {shape} (size {new_size})",
                self.size
            )));
        }
        self.shape = shape;
        Ok(())
    }

    /// [`reshape`](Self::reshape) to a dimension list folded by
    /// [`Shape::from_dims`].
    pub fn reshape_dims(&mut self, dims: &[usize]) -> Result<()> {
        self.reshape(Shape::from_dims(dims)?)
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    #[inline]
    fn check_flat(&self, index: usize) -> Result<()> {
        if index >= self.size {
            return Err(index_error(index, "flat index", self.size));
        }
        Ok(())
    }

    /// Flat offset `row * cols + col`, bounds-checked per axis.
    #[inline]
    pub fn flat_offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.shape.rows() {
            return Err(index_error(row, "row", self.shape.rows()));
        }
        if col >= self.shape.cols() {
            return Err(index_error(col, "column", self.shape.cols()));
        }
        Ok(row * self.shape.cols() + col)
    }

    /// Inverse of [`flat_offset`](Self::flat_offset).
    pub fn unravel(&self, index: usize) -> Result<(usize, usize)> {
        self.check_flat(index)?;
        Ok((index / self.shape.cols(), index % self.shape.cols()))
    }

    fn offset_of(&self, indices: &[usize]) -> Result<usize> {
        match *indices {
            [index] => {
                self.check_flat(index)?;
                Ok(index)
            }
            [row, col] => self.flat_offset(row, col),
            _ => Err(NdError::InvalidArgument(format!(
                "{} indices given; only flat (1) or (row, col) (2) indexing is supported",
                indices.len()
            ))),
        }
    }

    /// Read the element at flat position `index` (row-major order).
    #[inline]
    pub fn at(&self, index: usize) -> Result<T> {
        self.check_flat(index)?;
        Ok(self.storage.as_slice()[index])
    }

    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        self.check_flat(index)?;
        Ok(&mut self.storage.as_mut_slice()[index])
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    /// Read the element at `(row, col)`.
    #[inline]
    pub fn at2(&self, row: usize, col: usize) -> Result<T> {
        let offset = self.flat_offset(row, col)?;
        Ok(self.storage.as_slice()[offset])
    }

    #[inline]
    pub fn at2_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let offset = self.flat_offset(row, col)?;
        Ok(&mut self.storage.as_mut_slice()[offset])
    }

    #[inline]
    pub fn set2(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.at2_mut(row, col)? = value;
        Ok(())
    }

    /// Read through a multi-index: `[i]` is flat, `[row, col]` is 2D.
    ///
    /// # Errors
    /// `InvalidArgument` for any other number of indices, `IndexError` when
    /// an index is out of bounds.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        let offset = self.offset_of(indices)?;
        Ok(self.storage.as_slice()[offset])
    }

    pub fn get_mut(&mut self, indices: &[usize]) -> Result<&mut T> {
        let offset = self.offset_of(indices)?;
        Ok(&mut self.storage.as_mut_slice()[offset])
    }

    // ========================================================================
    // Buffer access and copies
    // ========================================================================

    /// The whole buffer in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Shallow copy: a view aliasing this array's buffer.
    ///
    /// The view starts with the same shape; reshaping it does not affect
    /// `self`, writing through it does.
    pub fn view_mut(&mut self) -> NdArray<'_, T> {
        NdArray {
            shape: self.shape,
            size: self.size,
            storage: Storage::View(self.storage.as_mut_slice()),
        }
    }

    /// Deep copy into a new owning array.
    pub fn deep_copy(&self) -> Result<NdArray<'static, T>> {
        let data = allocate_from_slice(self.as_slice())?;
        Ok(NdArray::from_storage(
            self.shape,
            self.size,
            Storage::Owned(data),
        ))
    }

    /// Convert into an owning array, copying only if `self` is a view.
    pub fn into_owned(self) -> Result<NdArray<'static, T>> {
        match self.storage {
            Storage::Owned(data) => Ok(NdArray::from_storage(
                self.shape,
                self.size,
                Storage::Owned(data),
            )),
            Storage::View(data) => NdArray::copy_from_slice(data, self.shape),
        }
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Iterate over rows as slices of length `cols`.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        let cols = self.shape.cols();
        let data = self.as_slice();
        (0..self.shape.rows()).map(move |r| &data[r * cols..(r + 1) * cols])
    }

    // ========================================================================
    // Equality
    // ========================================================================

    /// True iff shapes are equal and all elements compare equal pairwise.
    pub fn array_equal(&self, other: &NdArray<'_, T>) -> bool {
        self.shape == other.shape && self.as_slice() == other.as_slice()
    }
}

/// True iff `a` and `b` have equal shapes and equal elements.
///
/// Comparison is exact; floating-point values use `==` (so `NaN` never
/// compares equal).
pub fn array_equal<T: Element>(a: &NdArray<'_, T>, b: &NdArray<'_, T>) -> bool {
    a.array_equal(b)
}

impl<'b, T: Element> PartialEq<NdArray<'b, T>> for NdArray<'_, T> {
    fn eq(&self, other: &NdArray<'b, T>) -> bool {
        self.array_equal(other)
    }
}

impl<'s, T: Element> IntoIterator for &'s NdArray<'_, T> {
    type Item = &'s T;
    type IntoIter = std::slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Panicking index operators
// ============================================================================

impl<T: Element> Index<usize> for NdArray<'_, T> {
    type Output = T;

    /// # Panics
    /// Panics if `index >= size`.
    fn index(&self, index: usize) -> &T {
        if let Err(err) = self.check_flat(index) {
            panic!("{err}");
        }
        &self.as_slice()[index]
    }
}

impl<T: Element> IndexMut<usize> for NdArray<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Element> Index<(usize, usize)> for NdArray<'_, T> {
    type Output = T;

    /// # Panics
    /// Panics if `row` or `col` is out of bounds.
    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.flat_offset(row, col) {
            Ok(offset) => &self.as_slice()[offset],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Element> IndexMut<(usize, usize)> for NdArray<'_, T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.at2_mut(row, col) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
