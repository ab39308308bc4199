use std::fmt;

use crate::{NdError, Result};

const MAX_EXTENT: usize = isize::MAX as usize;

/// The `(rows, cols)` extent of an array.
///
/// A `Shape` is a plain value: it is compared by value and replaced
/// wholesale, never edited in place. The default shape is `0 x 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    #[inline]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// A `size x size` shape.
    #[inline]
    pub const fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Fold a list of dimension sizes into a 2D shape.
    ///
    /// All but the trailing dimension collapse into `rows`; the trailing
    /// dimension becomes `cols`. A single dimension `[n]` yields the row
    /// vector `(1, n)`.
    ///
    /// # Errors
    /// `InvalidShape` if `dims` is empty or the element count exceeds
    /// `isize::MAX`.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        let (&cols, leading) = dims
            .split_last()
            .ok_or_else(|| NdError::InvalidShape("empty dimension list".into()))?;
        let rows = leading.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
        let rows = rows.ok_or_else(|| {
            NdError::InvalidShape(format!("{dims:?} overflows the addressable size"))
        })?;
        let shape = Self::new(rows, cols);
        shape.size()?;
        Ok(shape)
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total element count `rows * cols`.
    ///
    /// Offsets and strides are `isize`, so no extent and no element count may
    /// exceed `isize::MAX`.
    ///
    /// # Errors
    /// `InvalidShape` if either extent or the product exceeds `isize::MAX`.
    pub fn size(&self) -> Result<usize> {
        self.rows
            .checked_mul(self.cols)
            .filter(|&n| n <= MAX_EXTENT && self.rows <= MAX_EXTENT && self.cols <= MAX_EXTENT)
            .ok_or_else(|| NdError::InvalidShape(format!("{self} overflows the addressable size")))
    }

    /// True for the `0 x 0` shape produced by `Shape::default()`.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    #[inline]
    pub const fn dims(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Row-major element strides `[cols, 1]`.
    ///
    /// Exact for every shape whose [`size`](Self::size) succeeds; a column
    /// count past `isize::MAX` saturates.
    #[inline]
    pub const fn strides(&self) -> [isize; 2] {
        let row = if self.cols > MAX_EXTENT {
            isize::MAX
        } else {
            self.cols as isize
        };
        [row, 1]
    }

    /// The shape with rows and columns exchanged.
    #[inline]
    pub const fn transposed(&self) -> Self {
        Self::new(self.cols, self.rows)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

/// Compute row-major strides (last index varies fastest).
///
/// For a logical shape `dims`, the flat offset of `index` is
/// `Σ index[i] * strides[i]`. This is how callers address arrays that were
/// built from more than two dimensions.
///
/// # Errors
/// `InvalidShape` if a stride does not fit in `isize`.
pub fn row_major_strides(dims: &[usize]) -> Result<Vec<isize>> {
    let overflow = || NdError::InvalidShape(format!("strides of {dims:?} overflow isize"));
    let mut strides = vec![1isize; dims.len()];
    for i in (0..dims.len().saturating_sub(1)).rev() {
        let dim = isize::try_from(dims[i + 1]).map_err(|_| overflow())?;
        strides[i] = strides[i + 1].checked_mul(dim).ok_or_else(overflow)?;
    }
    Ok(strides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        let s = Shape::default();
        assert!(s.is_null());
        assert_eq!(s.size().unwrap(), 0);
        assert!(!Shape::new(0, 3).is_null());
    }

    #[test]
    fn test_size() {
        assert_eq!(Shape::new(3, 4).size().unwrap(), 12);
        assert_eq!(Shape::square(5).size().unwrap(), 25);
    }

    #[test]
    fn test_size_overflow() {
        let s = Shape::new(usize::MAX, 2);
        assert!(matches!(s.size(), Err(NdError::InvalidShape(_))));
    }

    #[test]
    fn test_equality() {
        assert_eq!(Shape::new(2, 3), Shape::new(2, 3));
        assert_ne!(Shape::new(2, 3), Shape::new(3, 2));
        assert_eq!(Shape::new(2, 3).transposed(), Shape::new(3, 2));
    }

    #[test]
    fn test_from_dims_collapses_leading() {
        assert_eq!(Shape::from_dims(&[2, 3, 4]).unwrap(), Shape::new(6, 4));
        assert_eq!(Shape::from_dims(&[3, 4]).unwrap(), Shape::new(3, 4));
        assert_eq!(Shape::from_dims(&[2, 1, 5, 7]).unwrap(), Shape::new(10, 7));
    }

    #[test]
    fn test_from_dims_single_is_row_vector() {
        assert_eq!(Shape::from_dims(&[5]).unwrap(), Shape::new(1, 5));
    }

    #[test]
    fn test_from_dims_empty() {
        assert!(matches!(
            Shape::from_dims(&[]),
            Err(NdError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_from_dims_overflow() {
        assert!(matches!(
            Shape::from_dims(&[usize::MAX, 2, 1]),
            Err(NdError::InvalidShape(_))
        ));
        assert!(Shape::from_dims(&[usize::MAX, 2]).is_err());
    }

    #[test]
    fn test_extent_past_isize_max() {
        let wide = Shape::new(1, 1 << (usize::BITS - 1));
        assert!(matches!(wide.size(), Err(NdError::InvalidShape(_))));
        assert!(matches!(
            Shape::from_dims(&[1, 1 << (usize::BITS - 1)]),
            Err(NdError::InvalidShape(_))
        ));
        assert!(Shape::new(isize::MAX as usize, 1).size().is_ok());
        assert!(Shape::new(isize::MAX as usize, 2).size().is_err());
    }

    #[test]
    fn test_strides() {
        assert_eq!(Shape::new(3, 4).strides(), [4, 1]);
        assert_eq!(Shape::new(1, usize::MAX).strides(), [isize::MAX, 1]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(2, 7).to_string(), "[2, 7]");
    }

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[3, 4]).unwrap(), vec![4, 1]);
        assert_eq!(row_major_strides(&[2, 3, 4]).unwrap(), vec![12, 4, 1]);
        assert_eq!(row_major_strides(&[7]).unwrap(), vec![1]);
        assert!(row_major_strides(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_row_major_strides_overflow() {
        let huge = 1usize << (usize::BITS - 1);
        assert!(matches!(
            row_major_strides(&[2, huge]),
            Err(NdError::InvalidShape(_))
        ));
        assert!(matches!(
            row_major_strides(&[2, 1 << (usize::BITS / 2 + 1), 1 << (usize::BITS / 2 + 1)]),
            Err(NdError::InvalidShape(_))
        ));
        // the leading dimension never enters a stride
        assert_eq!(row_major_strides(&[usize::MAX, 3]).unwrap(), vec![3, 1]);
    }
}
