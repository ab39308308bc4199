//! Nested literal data, the stand-in for multi-level initializer lists.
//!
//! ```
//! use ndcore::{nested, NdArray, Shape};
//!
//! let a = NdArray::from_nested(nested![[[1, 2], [3, 4]], [[5, 6], [7, 8]]]).unwrap();
//! // dims [2, 2, 2] fold into (4, 2)
//! assert_eq!(a.shape(), Shape::new(4, 2));
//! assert_eq!(a.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);
//! ```

use smallvec::SmallVec;

use ndcore_traits::Element;

use crate::array::NdArray;
use crate::shape::Shape;
use crate::storage::Storage;
use crate::{NdError, Result};

/// A tree of values: either a single element or a list of subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Leaf(T),
    List(Vec<Nested<T>>),
}

/// Build a [`Nested`] literal from bracketed lists.
///
/// `nested![1, 2, 3]` is one level deep, `nested![[1, 2], [3, 4]]` two.
#[macro_export]
macro_rules! nested {
    ($([$($inner:tt)*]),+ $(,)?) => {
        $crate::Nested::List(vec![$($crate::nested!($($inner)*)),+])
    };
    ($($leaf:expr),* $(,)?) => {
        $crate::Nested::List(vec![$($crate::Nested::Leaf($leaf)),*])
    };
}

type Dims = SmallVec<[usize; 4]>;

impl<T> Nested<T> {
    /// Nesting depth and per-level lengths.
    ///
    /// Dimensions are read along the first branch and then every sibling is
    /// checked against them.
    ///
    /// # Errors
    /// `InvalidArgument` if the tree is a bare leaf (depth zero), if sibling
    /// lists differ in length, or if leaves appear at different depths.
    pub fn dims(&self) -> Result<SmallVec<[usize; 4]>> {
        let mut dims = Dims::new();
        let mut node = self;
        while let Nested::List(children) = node {
            dims.push(children.len());
            match children.first() {
                Some(first) => node = first,
                None => break,
            }
        }
        if dims.is_empty() {
            return Err(NdError::InvalidArgument(
                "nested data needs at least one level of nesting".into(),
            ));
        }
        self.validate(&dims, 0)?;
        Ok(dims)
    }

    fn validate(&self, dims: &[usize], level: usize) -> Result<()> {
        match (self, dims.get(level)) {
            (Nested::List(children), Some(&len)) => {
                if children.len() != len {
                    return Err(NdError::InvalidArgument(format!(
                        "nested data is not uniform: expected {len} elements at depth {level}, found {}",
                        children.len()
                    )));
                }
                children
                    .iter()
                    .try_for_each(|child| child.validate(dims, level + 1))
            }
            (Nested::Leaf(_), None) => Ok(()),
            (Nested::Leaf(_), Some(_)) => Err(NdError::InvalidArgument(format!(
                "nested data mixes depths: found a value at depth {level}, expected a list"
            ))),
            (Nested::List(_), None) => Err(NdError::InvalidArgument(format!(
                "nested data mixes depths: found a list at depth {level}, expected a value"
            ))),
        }
    }

    fn flatten_into(self, out: &mut Vec<T>) {
        match self {
            Nested::Leaf(value) => out.push(value),
            Nested::List(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(values: Vec<T>) -> Self {
        Nested::List(values.into_iter().map(Nested::Leaf).collect())
    }
}

impl<T: Element> NdArray<'static, T> {
    /// Build an array from nested literal data.
    ///
    /// The nesting dimensions are inferred and folded by
    /// [`Shape::from_dims`]; elements are copied in row-major order.
    ///
    /// # Errors
    /// `InvalidArgument` for depth-zero or non-uniform data.
    pub fn from_nested(data: Nested<T>) -> Result<Self> {
        let dims = data.dims()?;
        let shape = Shape::from_dims(&dims)?;
        let size = shape.size()?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(size)
            .map_err(|_| NdError::AllocationError { elements: size })?;
        data.flatten_into(&mut values);
        Ok(Self::from_storage(shape, size, Storage::Owned(values)))
    }
}
