//! `start:stop:step` selection along one axis.
//!
//! Slices are resolved against an axis length before use. Negative `start`
//! and `stop` count from the end of the axis; a negative `step` walks
//! downward. All selections are expressed through the row-major offset
//! `row * cols + col`, so slicing always copies into a new owning array.
//!
//! ```
//! use ndcore::{NdArray, Shape, Slice};
//!
//! let a = NdArray::from_fn(Shape::new(3, 4), |r, c| (10 * r + c) as i32).unwrap();
//! let b = a.slice2(&Slice::range(1, 3), &Slice::new(None, None, -2)).unwrap();
//! assert_eq!(b.shape(), Shape::new(2, 2));
//! assert_eq!(b.as_slice(), &[13, 11, 23, 21]);
//! ```

use std::fmt;

use ndcore_traits::Element;

use crate::array::{index_error, NdArray};
use crate::shape::Shape;
use crate::{NdError, Result};

/// A `start:stop:step` selection. `None` bounds run to the end of the axis
/// in the direction of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl Default for Slice {
    fn default() -> Self {
        Self::full()
    }
}

impl Slice {
    #[inline]
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    /// `start..stop` with unit step.
    #[inline]
    pub const fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), 1)
    }

    /// The whole axis, `::`.
    #[inline]
    pub const fn full() -> Self {
        Self::new(None, None, 1)
    }

    /// The whole axis backwards, `::-1`.
    #[inline]
    pub const fn reversed() -> Self {
        Self::new(None, None, -1)
    }

    /// A single index `i:i+1`.
    #[inline]
    pub const fn index(i: isize) -> Self {
        // -1:0 would be empty and isize::MAX + 1 overflows; both take an
        // open stop
        match i.checked_add(1) {
            Some(stop) if stop != 0 => Self::new(Some(i), Some(stop), 1),
            _ => Self::new(Some(i), None, 1),
        }
    }

    #[inline]
    pub const fn with_step(self, step: isize) -> Self {
        Self::new(self.start, self.stop, step)
    }

    /// Resolve against an axis of length `len`.
    ///
    /// # Errors
    /// - `InvalidArgument` if `step` is zero, or if the resolved `start` and
    ///   `stop` run against the direction of `step` (e.g. `3:1:1`).
    /// - `IndexError` if an explicit `start` falls outside `[0, len)` or an
    ///   explicit `stop` outside `[0, len]` after negative wrap-around.
    ///   Bounds are never clamped.
    pub fn resolve(&self, len: usize) -> Result<SliceRange> {
        if self.step == 0 {
            return Err(NdError::InvalidArgument("slice step cannot be zero".into()));
        }
        let ilen = isize::try_from(len)
            .map_err(|_| NdError::InvalidArgument(format!("axis length {len} is too large")))?;

        let start = match self.start {
            Some(raw) => {
                let start = wrap(raw, ilen);
                if start < 0 || start >= ilen {
                    return Err(slice_error(raw, "slice start", len));
                }
                start
            }
            None if self.step > 0 => 0,
            None => ilen - 1,
        };
        let stop = match self.stop {
            Some(raw) => {
                let stop = wrap(raw, ilen);
                if stop < 0 || stop > ilen {
                    return Err(slice_error(raw, "slice stop", len));
                }
                stop
            }
            None if self.step > 0 => ilen,
            None => -1,
        };

        if (self.step > 0 && stop < start) || (self.step < 0 && stop > start) {
            return Err(NdError::InvalidArgument(format!(
                "slice {self} resolves to start {start} and stop {stop}, \
                 against the direction of its step"
            )));
        }
        let count = start
            .abs_diff(stop)
            .div_ceil(self.step.unsigned_abs());

        Ok(SliceRange {
            start,
            step: self.step,
            len: count,
        })
    }
}

#[inline]
fn wrap(index: isize, len: isize) -> isize {
    if index < 0 {
        index + len
    } else {
        index
    }
}

fn slice_error(index: isize, axis: &'static str, len: usize) -> NdError {
    NdError::IndexError { index, axis, len }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<isize>| b.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "[{}:{}:{}]", bound(self.start), bound(self.stop), self.step)
    }
}

/// A resolved slice: `len` indices starting at `start`, `step` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRange {
    pub start: isize,
    pub step: isize,
    pub len: usize,
}

impl SliceRange {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The selected indices in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let SliceRange { start, step, len } = *self;
        // every produced index lies in [0, axis len) by construction
        (0..len).map(move |i| (start + i as isize * step) as usize)
    }
}

// ============================================================================
// Slicing on NdArray
// ============================================================================

impl<'a, T: Element> NdArray<'a, T> {
    /// Copy the flat elements selected by `s` into a `(1, n)` row vector.
    pub fn slice(&self, s: &Slice) -> Result<NdArray<'static, T>> {
        let range = s.resolve(self.size())?;
        let data = self.as_slice();
        let values = range.iter().map(|i| data[i]).collect();
        NdArray::from_shape_vec(Shape::new(1, range.len), values)
    }

    /// Copy the `(rows, cols)` sub-grid selected by two slices.
    pub fn slice2(&self, rows: &Slice, cols: &Slice) -> Result<NdArray<'static, T>> {
        let rr = rows.resolve(self.num_rows())?;
        let cr = cols.resolve(self.num_cols())?;
        let ncols = self.num_cols();
        let data = self.as_slice();
        let mut values = Vec::with_capacity(rr.len * cr.len);
        for r in rr.iter() {
            values.extend(cr.iter().map(|c| data[r * ncols + c]));
        }
        NdArray::from_shape_vec(Shape::new(rr.len, cr.len), values)
    }

    /// Copy of row `row` as a `(1, cols)` array.
    pub fn row(&self, row: usize) -> Result<NdArray<'static, T>> {
        if row >= self.num_rows() {
            return Err(index_error(row, "row", self.num_rows()));
        }
        let cols = self.num_cols();
        NdArray::copy_from_slice(&self.as_slice()[row * cols..], Shape::new(1, cols))
    }

    /// Copy of column `col` as a `(rows, 1)` array.
    pub fn column(&self, col: usize) -> Result<NdArray<'static, T>> {
        if col >= self.num_cols() {
            return Err(index_error(col, "column", self.num_cols()));
        }
        let cols = self.num_cols();
        let values = self.as_slice().iter().skip(col).step_by(cols).copied().collect();
        NdArray::from_shape_vec(Shape::new(self.num_rows(), 1), values)
    }

    /// Rows from `start` to the last row with the given step, bound to this
    /// array's row count. The stop is the row count, so `step` must be
    /// positive.
    #[inline]
    pub fn r_slice(&self, start: isize, step: isize) -> Slice {
        Slice::new(Some(start), Some(axis_end(self.num_rows())), step)
    }

    /// Columns from `start` to the last column with the given step, bound to
    /// this array's column count. `step` must be positive.
    #[inline]
    pub fn c_slice(&self, start: isize, step: isize) -> Slice {
        Slice::new(Some(start), Some(axis_end(self.num_cols())), step)
    }

    /// Write `value` into every flat position selected by `s`.
    pub fn put_slice(&mut self, s: &Slice, value: T) -> Result<()> {
        let range = s.resolve(self.size())?;
        let data = self.as_mut_slice();
        for i in range.iter() {
            data[i] = value;
        }
        Ok(())
    }

    /// Write `values` in row-major order into the flat positions selected by
    /// `s`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `values` does not hold exactly as many elements as
    /// the slice selects. Nothing is written in that case.
    pub fn put_slice_values(&mut self, s: &Slice, values: &NdArray<'_, T>) -> Result<()> {
        let range = s.resolve(self.size())?;
        check_count(range.len, values.size())?;
        let data = self.as_mut_slice();
        for (i, &v) in range.iter().zip(values.iter()) {
            data[i] = v;
        }
        Ok(())
    }

    /// Write `value` into every `(row, col)` selected by two slices.
    pub fn put_slice2(&mut self, rows: &Slice, cols: &Slice, value: T) -> Result<()> {
        let rr = rows.resolve(self.num_rows())?;
        let cr = cols.resolve(self.num_cols())?;
        let ncols = self.num_cols();
        let data = self.as_mut_slice();
        for r in rr.iter() {
            for c in cr.iter() {
                data[r * ncols + c] = value;
            }
        }
        Ok(())
    }

    /// Write `values` in row-major order into the sub-grid selected by two
    /// slices.
    pub fn put_slice2_values(
        &mut self,
        rows: &Slice,
        cols: &Slice,
        values: &NdArray<'_, T>,
    ) -> Result<()> {
        let rr = rows.resolve(self.num_rows())?;
        let cr = cols.resolve(self.num_cols())?;
        check_count(rr.len * cr.len, values.size())?;
        let ncols = self.num_cols();
        let data = self.as_mut_slice();
        let mut src = values.iter();
        for r in rr.iter() {
            for c in cr.iter() {
                if let Some(&v) = src.next() {
                    data[r * ncols + c] = v;
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn axis_end(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}

fn check_count(selected: usize, given: usize) -> Result<()> {
    if selected != given {
        return Err(NdError::ShapeMismatch(format!(
            "slice selects {selected} elements but {given} values were given"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize) -> NdArray<'static, i32> {
        NdArray::from_fn(Shape::new(rows, cols), |r, c| (10 * r + c) as i32).unwrap()
    }

    fn indices(s: Slice, len: usize) -> Vec<usize> {
        s.resolve(len).unwrap().iter().collect()
    }

    #[test]
    fn test_resolve_forward() {
        assert_eq!(indices(Slice::full(), 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(indices(Slice::range(1, 4), 5), vec![1, 2, 3]);
        assert_eq!(indices(Slice::range(0, 5).with_step(2), 5), vec![0, 2, 4]);
        assert_eq!(indices(Slice::range(1, 5).with_step(3), 5), vec![1, 4]);
    }

    #[test]
    fn test_resolve_negative_bounds() {
        assert_eq!(indices(Slice::range(-3, -1), 5), vec![2, 3]);
        assert_eq!(indices(Slice::new(Some(-2), None, 1), 5), vec![3, 4]);
        assert_eq!(indices(Slice::index(-1), 5), vec![4]);
        assert_eq!(indices(Slice::index(2), 5), vec![2]);
    }

    #[test]
    fn test_resolve_backward() {
        assert_eq!(indices(Slice::reversed(), 4), vec![3, 2, 1, 0]);
        assert_eq!(indices(Slice::new(Some(4), Some(0), -2), 5), vec![4, 2]);
        assert_eq!(indices(Slice::new(None, Some(1), -1), 4), vec![3, 2]);
    }

    #[test]
    fn test_resolve_direction_mismatch() {
        assert!(matches!(
            Slice::range(3, 1).resolve(5),
            Err(NdError::InvalidArgument(_))
        ));
        assert!(matches!(
            Slice::new(Some(1), Some(3), -1).resolve(5),
            Err(NdError::InvalidArgument(_))
        ));
        assert!(matches!(
            Slice::new(None, Some(5), -1).resolve(5),
            Err(NdError::InvalidArgument(_))
        ));
        // equal bounds are an empty selection in either direction
        assert!(Slice::range(2, 2).resolve(5).unwrap().is_empty());
        assert!(Slice::new(Some(2), Some(2), -1).resolve(5).unwrap().is_empty());
    }

    #[test]
    fn test_index_at_isize_max() {
        let s = Slice::index(isize::MAX);
        assert_eq!(s.stop, None);
        assert!(matches!(
            s.resolve(5),
            Err(NdError::IndexError { axis: "slice start", .. })
        ));
        assert_eq!(Slice::index(-1).stop, None);
        assert_eq!(Slice::index(-2), Slice::range(-2, -1));
    }

    #[test]
    fn test_resolve_zero_step() {
        let err = Slice::full().with_step(0).resolve(3).unwrap_err();
        assert!(matches!(err, NdError::InvalidArgument(_)));
    }

    #[test]
    fn test_resolve_out_of_range_not_clamped() {
        assert!(matches!(
            Slice::range(5, 5).resolve(5),
            Err(NdError::IndexError { axis: "slice start", index: 5, len: 5 })
        ));
        assert!(matches!(
            Slice::range(0, 6).resolve(5),
            Err(NdError::IndexError { axis: "slice stop", .. })
        ));
        assert!(matches!(
            Slice::range(-6, 2).resolve(5),
            Err(NdError::IndexError { index: -6, .. })
        ));
    }

    #[test]
    fn test_resolve_empty_axis() {
        assert!(Slice::full().resolve(0).unwrap().is_empty());
        assert!(Slice::reversed().resolve(0).unwrap().is_empty());
        assert!(Slice::range(0, 0).resolve(0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Slice::range(1, 4).to_string(), "[1:4:1]");
        assert_eq!(Slice::reversed().to_string(), "[::-1]");
    }

    #[test]
    fn test_flat_slice() {
        let a = grid(2, 3);
        let s = a.slice(&Slice::new(Some(1), None, 2)).unwrap();
        assert_eq!(s.shape(), Shape::new(1, 3));
        assert_eq!(s.as_slice(), &[1, 10, 12]);
    }

    #[test]
    fn test_slice2() {
        let a = grid(4, 4);
        let b = a.slice2(&a.r_slice(1, 2), &Slice::range(0, 2)).unwrap();
        assert_eq!(b.shape(), Shape::new(2, 2));
        assert_eq!(b.as_slice(), &[10, 11, 30, 31]);

        let c = a.slice2(&Slice::reversed(), &a.c_slice(-1, 1)).unwrap();
        assert_eq!(c.as_slice(), &[33, 23, 13, 3]);

        let wide = grid(2, 5);
        assert_eq!(wide.c_slice(1, 2), Slice::new(Some(1), Some(5), 2));
        assert_eq!(wide.r_slice(0, 1), Slice::range(0, 2));
        assert_eq!(indices(wide.c_slice(1, 2), wide.num_cols()), vec![1, 3]);
    }

    #[test]
    fn test_row_and_column() {
        let a = grid(3, 2);
        assert_eq!(a.row(1).unwrap().as_slice(), &[10, 11]);
        assert_eq!(a.row(1).unwrap().shape(), Shape::new(1, 2));
        let col = a.column(1).unwrap();
        assert_eq!(col.shape(), Shape::new(3, 1));
        assert_eq!(col.as_slice(), &[1, 11, 21]);
        assert!(matches!(a.row(3), Err(NdError::IndexError { axis: "row", .. })));
        assert!(matches!(a.column(2), Err(NdError::IndexError { axis: "column", .. })));
    }

    #[test]
    fn test_put_slice() {
        let mut a = grid(2, 3);
        a.put_slice(&Slice::new(None, None, 2), -1).unwrap();
        assert_eq!(a.as_slice(), &[-1, 1, -1, 10, -1, 12]);

        a.put_slice2(&Slice::index(1), &Slice::range(1, 3), 0).unwrap();
        assert_eq!(a.as_slice(), &[-1, 1, -1, 10, 0, 0]);
    }

    #[test]
    fn test_put_slice_values() {
        let mut a = NdArray::<i32>::new(3, 3).unwrap();
        let values = NdArray::from_vec(vec![1, 2, 3, 4]);
        a.put_slice2_values(&Slice::range(0, 2), &Slice::range(1, 3), &values)
            .unwrap();
        assert_eq!(a.as_slice(), &[0, 1, 2, 0, 3, 4, 0, 0, 0]);

        a.put_slice_values(&Slice::reversed().with_step(-4), &NdArray::from_vec(vec![7, 8, 9]))
            .unwrap();
        assert_eq!(a.at(8).unwrap(), 7);
        assert_eq!(a.at(4).unwrap(), 8);
        assert_eq!(a.at(0).unwrap(), 9);
    }

    #[test]
    fn test_put_slice_values_mismatch_writes_nothing() {
        let mut a = grid(2, 2);
        let err = a
            .put_slice_values(&Slice::full(), &NdArray::from_vec(vec![1, 2, 3]))
            .unwrap_err();
        assert!(matches!(err, NdError::ShapeMismatch(_)));
        assert_eq!(a.as_slice(), &[0, 1, 10, 11]);
    }
}
