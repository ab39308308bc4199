//! Broadcast validation and broadcast-aware elementwise combinators.
//!
//! Two extents are compatible along an axis when they are equal or one of
//! them is 1; the result takes the larger. An axis of extent 1 is read with
//! stride 0, so its single element is reused across the whole axis.
//!
//! ```
//! use ndcore::{zip_map, NdArray, Shape};
//!
//! let col = NdArray::from_shape_vec(Shape::new(3, 1), vec![0, 10, 20]).unwrap();
//! let row = NdArray::from_vec(vec![1, 2]);
//! let sum = zip_map(&col, &row, |a, b| a + b).unwrap();
//! assert_eq!(sum.shape(), Shape::new(3, 2));
//! assert_eq!(sum.as_slice(), &[1, 2, 11, 12, 21, 22]);
//! ```

use ndcore_traits::Element;

use crate::array::NdArray;
use crate::shape::Shape;
use crate::{NdError, Result};

/// Broadcast two dimension lists, aligning them at the trailing axis.
///
/// Missing leading axes count as 1. Returns `None` if the lists are
/// incompatible.
///
/// ```
/// use ndcore::broadcast_dims;
///
/// assert_eq!(broadcast_dims(&[4, 1, 3], &[5, 1]), Some(vec![4, 5, 3]));
/// assert_eq!(broadcast_dims(&[2, 3], &[3, 2]), None);
/// ```
pub fn broadcast_dims(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut result = vec![0usize; rank];

    for i in 0..rank {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        result[rank - 1 - i] = if a_dim == b_dim || b_dim == 1 {
            a_dim
        } else if a_dim == 1 {
            b_dim
        } else {
            return None;
        };
    }

    Some(result)
}

/// Broadcast two shapes axis by axis.
///
/// # Errors
/// `ShapeMismatch` naming both shapes if an axis is incompatible.
pub fn broadcast_shape(a: Shape, b: Shape) -> Result<Shape> {
    match broadcast_dims(&a.dims(), &b.dims()).as_deref() {
        Some(&[rows, cols]) => Ok(Shape::new(rows, cols)),
        _ => Err(NdError::ShapeMismatch(format!(
            "shapes {a} and {b} cannot be broadcast together"
        ))),
    }
}

/// Element strides that read `src` as if it had shape `target`.
///
/// Axes that are broadcast get stride 0.
fn promote_strides(src: Shape, target: Shape) -> Result<[usize; 2]> {
    let axis = |s: usize, t: usize, stride: usize| -> Result<usize> {
        if s == t {
            Ok(stride)
        } else if s == 1 {
            Ok(0)
        } else {
            Err(NdError::ShapeMismatch(format!(
                "shape {src} cannot be broadcast to {target}"
            )))
        }
    };
    Ok([
        axis(src.rows(), target.rows(), src.cols())?,
        axis(src.cols(), target.cols(), 1)?,
    ])
}

impl<'a, T: Element> NdArray<'a, T> {
    /// Expand size-1 axes into a new owning array of shape `shape`.
    ///
    /// # Errors
    /// `ShapeMismatch` if an axis differs from `shape` and is not 1.
    pub fn broadcast_to(&self, shape: Shape) -> Result<NdArray<'static, T>> {
        let [row_stride, col_stride] = promote_strides(self.shape(), shape)?;
        let data = self.as_slice();
        NdArray::from_fn(shape, |r, c| data[r * row_stride + c * col_stride])
    }

    /// Combine `other` into `self` in place, broadcasting `other` to this
    /// array's shape.
    ///
    /// # Errors
    /// `ShapeMismatch` if `other` cannot be broadcast to `self.shape()`; the
    /// array is unchanged.
    pub fn zip_apply<U: Element>(
        &mut self,
        other: &NdArray<'_, U>,
        mut f: impl FnMut(T, U) -> T,
    ) -> Result<()> {
        let shape = self.shape();
        let [row_stride, col_stride] = promote_strides(other.shape(), shape)?;
        let src = other.as_slice();
        let cols = shape.cols();
        for (i, x) in self.iter_mut().enumerate() {
            let (r, c) = (i / cols, i % cols);
            *x = f(*x, src[r * row_stride + c * col_stride]);
        }
        Ok(())
    }
}

/// Apply `f` pairwise over the broadcast of `a` and `b`.
///
/// # Errors
/// `ShapeMismatch` if the shapes cannot be broadcast together.
pub fn zip_map<A, B, C>(
    a: &NdArray<'_, A>,
    b: &NdArray<'_, B>,
    mut f: impl FnMut(A, B) -> C,
) -> Result<NdArray<'static, C>>
where
    A: Element,
    B: Element,
    C: Element,
{
    let shape = broadcast_shape(a.shape(), b.shape())?;
    let [ar, ac] = promote_strides(a.shape(), shape)?;
    let [br, bc] = promote_strides(b.shape(), shape)?;
    let (da, db) = (a.as_slice(), b.as_slice());
    NdArray::from_fn(shape, |r, c| f(da[r * ar + c * ac], db[r * br + c * bc]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_dims() {
        assert_eq!(broadcast_dims(&[3, 1], &[1, 4]), Some(vec![3, 4]));
        assert_eq!(broadcast_dims(&[2, 3, 4], &[4]), Some(vec![2, 3, 4]));
        assert_eq!(broadcast_dims(&[], &[2, 2]), Some(vec![2, 2]));
        assert_eq!(broadcast_dims(&[0, 3], &[1, 3]), Some(vec![0, 3]));
        assert_eq!(broadcast_dims(&[2, 3], &[4, 3]), None);
    }

    #[test]
    fn test_broadcast_shape() {
        assert_eq!(
            broadcast_shape(Shape::new(1, 3), Shape::new(4, 1)).unwrap(),
            Shape::new(4, 3)
        );
        assert_eq!(
            broadcast_shape(Shape::new(2, 5), Shape::new(2, 5)).unwrap(),
            Shape::new(2, 5)
        );
        let err = broadcast_shape(Shape::new(2, 3), Shape::new(3, 2)).unwrap_err();
        assert!(matches!(err, NdError::ShapeMismatch(_)));
        assert!(err.to_string().contains("[2, 3]"));
    }

    #[test]
    fn test_broadcast_to() {
        let row = NdArray::from_vec(vec![1, 2, 3]);
        let tiled = row.broadcast_to(Shape::new(2, 3)).unwrap();
        assert_eq!(tiled.as_slice(), &[1, 2, 3, 1, 2, 3]);

        let scalar = NdArray::from_vec(vec![5u8]);
        let filled = scalar.broadcast_to(Shape::new(2, 2)).unwrap();
        assert!(filled.iter().all(|&x| x == 5));

        assert!(row.broadcast_to(Shape::new(1, 4)).is_err());
        // broadcasting only expands; it never shrinks
        assert!(tiled.broadcast_to(Shape::new(1, 3)).is_err());
    }

    #[test]
    fn test_zip_map_same_shape() {
        let a = NdArray::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = NdArray::from_rows(vec![vec![0.5, 0.5], vec![2.0, 2.0]]).unwrap();
        let prod = zip_map(&a, &b, |x, y| x * y).unwrap();
        assert_eq!(prod.as_slice(), &[0.5, 1.0, 6.0, 8.0]);
    }

    #[test]
    fn test_zip_map_mixed_types() {
        let mask = NdArray::from_vec(vec![true, false, true]);
        let values = NdArray::from_shape_vec(Shape::new(2, 1), vec![1i64, -1]).unwrap();
        let picked = zip_map(&values, &mask, |v, m| if m { v } else { 0 }).unwrap();
        assert_eq!(picked.shape(), Shape::new(2, 3));
        assert_eq!(picked.as_slice(), &[1, 0, 1, -1, 0, -1]);
    }

    #[test]
    fn test_zip_map_incompatible() {
        let a = NdArray::<i32>::new(2, 3).unwrap();
        let b = NdArray::<i32>::new(3, 2).unwrap();
        assert!(matches!(
            zip_map(&a, &b, |x, y| x + y),
            Err(NdError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_zip_apply() {
        let mut a = NdArray::from_fn(Shape::new(2, 3), |r, c| (r * 3 + c) as i32).unwrap();
        let bias = NdArray::from_shape_vec(Shape::new(2, 1), vec![100, 200]).unwrap();
        a.zip_apply(&bias, |x, b| x + b).unwrap();
        assert_eq!(a.as_slice(), &[100, 101, 102, 203, 204, 205]);

        let wide = NdArray::<i32>::new(2, 4).unwrap();
        assert!(a.zip_apply(&wide, |x, _| x).is_err());
        assert_eq!(a.at(0).unwrap(), 100);
    }
}
