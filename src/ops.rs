//! Whole-array maintenance: filling, copies in a new layout, resizing,
//! element conversion, scalar accessors and boolean masks.

use num_traits::AsPrimitive;

use ndcore_traits::{Element, Numeric};

use crate::array::{index_error, NdArray};
use crate::shape::Shape;
use crate::storage::{allocate, Storage};
use crate::{NdError, Result};

/// Edge length of the square blocks used by [`NdArray::transpose`].
const TRANSPOSE_TILE: usize = 16;

impl<T: Element> NdArray<'static, T> {
    /// Create an array of the given shape with every element set to `value`.
    pub fn filled(shape: Shape, value: T) -> Result<Self> {
        let size = shape.size()?;
        let data = allocate(size, value)?;
        Ok(Self::from_storage(shape, size, Storage::Owned(data)))
    }
}

impl<'a, T: Element> NdArray<'a, T> {
    // ========================================================================
    // Filling
    // ========================================================================

    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Set every element to zero.
    pub fn zeros(&mut self)
    where
        T: Numeric,
    {
        self.fill(T::zero());
    }

    /// Set every element to one.
    pub fn ones(&mut self)
    where
        T: Numeric,
    {
        self.fill(T::one());
    }

    // ========================================================================
    // Copies in a new layout
    // ========================================================================

    /// Deep copy as a `(1, size)` row vector.
    pub fn flatten(&self) -> Result<NdArray<'static, T>> {
        NdArray::copy_from_slice(self.as_slice(), Shape::new(1, self.size()))
    }

    /// Deep copy with rows and columns exchanged.
    pub fn transpose(&self) -> Result<NdArray<'static, T>> {
        let (rows, cols) = (self.num_rows(), self.num_cols());
        let mut out = NdArray::from_shape(self.shape().transposed())?;
        let src = self.as_slice();
        let dst = out.as_mut_slice();
        for i0 in (0..rows).step_by(TRANSPOSE_TILE) {
            let i_max = (i0 + TRANSPOSE_TILE).min(rows);
            for j0 in (0..cols).step_by(TRANSPOSE_TILE) {
                let j_max = (j0 + TRANSPOSE_TILE).min(cols);
                for i in i0..i_max {
                    for j in j0..j_max {
                        dst[j * rows + i] = src[i * cols + j];
                    }
                }
            }
        }
        Ok(out)
    }

    /// Tile the array `rows` times vertically and `cols` times horizontally.
    ///
    /// # Errors
    /// `InvalidShape` if the tiled shape overflows.
    pub fn repeat(&self, rows: usize, cols: usize) -> Result<NdArray<'static, T>> {
        let overflow = || {
            NdError::InvalidShape(format!(
                "repeating {} by ({rows}, {cols}) overflows the addressable size",
                self.shape()
            ))
        };
        let out_rows = self.num_rows().checked_mul(rows).ok_or_else(overflow)?;
        let out_cols = self.num_cols().checked_mul(cols).ok_or_else(overflow)?;
        let shape = Shape::new(out_rows, out_cols);
        let size = shape.size()?;

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| NdError::AllocationError { elements: size })?;
        for _ in 0..rows {
            for row in self.rows_iter() {
                for _ in 0..cols {
                    data.extend_from_slice(row);
                }
            }
        }
        NdArray::from_shape_vec(shape, data)
    }

    /// Copy the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Apply `f` to every element, producing a new array of the same shape.
    pub fn map<U: Element>(&self, f: impl FnMut(T) -> U) -> Result<NdArray<'static, U>> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.size())
            .map_err(|_| NdError::AllocationError {
                elements: self.size(),
            })?;
        data.extend(self.iter().copied().map(f));
        NdArray::from_shape_vec(self.shape(), data)
    }

    /// Convert every element with an `as` cast.
    ///
    /// ```
    /// use ndcore::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![1.7f64, -2.2, 300.0]);
    /// let b = a.astype::<u8>().unwrap();
    /// assert_eq!(b.as_slice(), &[1, 0, 255]);
    /// ```
    pub fn astype<U>(&self) -> Result<NdArray<'static, U>>
    where
        T: AsPrimitive<U>,
        U: Element,
    {
        self.map(|x| x.as_())
    }

    // ========================================================================
    // Resizing
    // ========================================================================

    fn ensure_owned(&self, op: &str) -> Result<()> {
        if self.is_view() {
            return Err(NdError::InvalidArgument(format!(
                "{op} needs an owning array; a view cannot reallocate its buffer"
            )));
        }
        Ok(())
    }

    /// Replace the buffer with a default-filled one of the new shape.
    ///
    /// Previous contents are discarded.
    ///
    /// # Errors
    /// `InvalidArgument` for views. On any error the array is unchanged.
    pub fn resize_fast(&mut self, shape: Shape) -> Result<()> {
        self.ensure_owned("resize_fast")?;
        let size = shape.size()?;
        let data = allocate(size, T::default())?;
        *self = NdArray::from_storage(shape, size, Storage::Owned(data));
        Ok(())
    }

    /// Change the shape, keeping every element whose `(row, col)` exists in
    /// both shapes. New positions are default-filled.
    ///
    /// # Errors
    /// `InvalidArgument` for views. On any error the array is unchanged.
    pub fn resize_slow(&mut self, shape: Shape) -> Result<()> {
        self.ensure_owned("resize_slow")?;
        let size = shape.size()?;
        let mut data = allocate(size, T::default())?;
        let keep_rows = self.num_rows().min(shape.rows());
        let keep_cols = self.num_cols().min(shape.cols());
        for (r, row) in self.rows_iter().take(keep_rows).enumerate() {
            let dst = r * shape.cols();
            data[dst..dst + keep_cols].copy_from_slice(&row[..keep_cols]);
        }
        *self = NdArray::from_storage(shape, size, Storage::Owned(data));
        Ok(())
    }

    // ========================================================================
    // Scalar accessors
    // ========================================================================

    /// The first element in row-major order.
    pub fn front(&self) -> Result<T> {
        self.at(0)
    }

    /// The last element in row-major order.
    pub fn back(&self) -> Result<T> {
        match self.size() {
            0 => Err(index_error(0, "flat index", 0)),
            n => self.at(n - 1),
        }
    }

    /// The only element of a single-element array.
    ///
    /// # Errors
    /// `InvalidArgument` unless `size() == 1`.
    pub fn item(&self) -> Result<T> {
        if self.size() != 1 {
            return Err(NdError::InvalidArgument(format!(
                "item() needs an array of size 1, found shape {}",
                self.shape()
            )));
        }
        self.at(0)
    }

    /// Gather the elements at the given flat indices.
    ///
    /// Indices are sorted and de-duplicated first, so the result lists each
    /// selected element once, in row-major order.
    ///
    /// # Errors
    /// `IndexError` if any index is `>= size()`.
    pub fn get_by_indices(&self, indices: &[usize]) -> Result<NdArray<'static, T>> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if let Some(&last) = sorted.last() {
            if last >= self.size() {
                return Err(index_error(last, "flat index", self.size()));
            }
        }
        let data = self.as_slice();
        let values = sorted.iter().map(|&i| data[i]).collect();
        NdArray::from_shape_vec(Shape::new(1, sorted.len()), values)
    }

    /// Write `value` at flat position `index`.
    #[inline]
    pub fn put(&mut self, index: usize, value: T) -> Result<()> {
        self.set(index, value)
    }

    // ========================================================================
    // Boolean masks
    // ========================================================================

    fn check_mask(&self, mask: &NdArray<'_, bool>) -> Result<()> {
        if mask.shape() != self.shape() {
            return Err(NdError::ShapeMismatch(format!(
                "mask of shape {} does not match array of shape {}",
                mask.shape(),
                self.shape()
            )));
        }
        Ok(())
    }

    /// Flat indices of the elements that differ from `T::default()`.
    pub fn flatnonzero(&self) -> Result<NdArray<'static, usize>> {
        let zero = T::default();
        let indices = self
            .iter()
            .enumerate()
            .filter(|&(_, &x)| x != zero)
            .map(|(i, _)| i)
            .collect();
        Ok(NdArray::from_vec(indices))
    }

    /// Gather the elements where `mask` is true, in row-major order, as a
    /// `(1, n)` row vector.
    ///
    /// # Errors
    /// `ShapeMismatch` if `mask` and `self` differ in shape.
    pub fn get_by_mask(&self, mask: &NdArray<'_, bool>) -> Result<NdArray<'static, T>> {
        self.check_mask(mask)?;
        let values = self
            .iter()
            .zip(mask.iter())
            .filter(|&(_, &m)| m)
            .map(|(&x, _)| x)
            .collect();
        Ok(NdArray::from_vec(values))
    }

    /// Write `value` wherever `mask` is true.
    ///
    /// # Errors
    /// `ShapeMismatch` if `mask` and `self` differ in shape.
    pub fn put_mask(&mut self, mask: &NdArray<'_, bool>, value: T) -> Result<()> {
        self.check_mask(mask)?;
        for (x, &m) in self.iter_mut().zip(mask.iter()) {
            if m {
                *x = value;
            }
        }
        Ok(())
    }

    /// Write `values` in row-major order into the positions where `mask` is
    /// true. A single value is written to every such position.
    ///
    /// # Errors
    /// `ShapeMismatch` if the shapes differ, or if `values` holds neither one
    /// element nor exactly one per true mask entry. Nothing is written then.
    pub fn put_mask_values(
        &mut self,
        mask: &NdArray<'_, bool>,
        values: &NdArray<'_, T>,
    ) -> Result<()> {
        self.check_mask(mask)?;
        if values.size() == 1 {
            return self.put_mask(mask, values.as_slice()[0]);
        }
        let selected = mask.iter().filter(|&&m| m).count();
        if values.size() != selected {
            return Err(NdError::ShapeMismatch(format!(
                "mask selects {selected} elements but {} values were given",
                values.size()
            )));
        }
        let mut src = values.iter();
        for (x, &m) in self.iter_mut().zip(mask.iter()) {
            if m {
                if let Some(&v) = src.next() {
                    *x = v;
                }
            }
        }
        Ok(())
    }
}
