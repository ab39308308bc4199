//! Introspection and text rendering.

use std::fmt;

use ndcore_traits::{Element, ElementKind};

use crate::array::NdArray;
use crate::shape::Shape;
use crate::storage::Ownership;

/// Summary of an array's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    pub shape: Shape,
    pub size: usize,
    pub kind: ElementKind,
    pub name: &'static str,
    pub ownership: Ownership,
    pub nbytes: usize,
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = match self.ownership {
            Ownership::Copy => "owned",
            Ownership::View => "view",
        };
        write!(
            f,
            "shape: {}, size: {}, dtype: {} ({}), storage: {owner}, nbytes: {}",
            self.shape, self.size, self.name, self.kind, self.nbytes
        )
    }
}

impl<'a, T: Element> NdArray<'a, T> {
    pub fn info(&self) -> Info {
        Info {
            shape: self.shape(),
            size: self.size(),
            kind: T::KIND,
            name: T::NAME,
            ownership: self.ownership(),
            nbytes: self.nbytes(),
        }
    }

    /// Print [`info`](Self::info) to standard output.
    pub fn print_info(&self) {
        println!("{}", self.info());
    }
}

/// Rows are rendered on separate lines:
///
/// ```text
/// [[1, 2, 3]
///  [4, 5, 6]]
/// ```
impl<T: Element> fmt::Display for NdArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_rows() == 0 {
            return f.write_str("[]");
        }
        f.write_str("[")?;
        for (r, row) in self.rows_iter().enumerate() {
            if r > 0 {
                f.write_str("\n ")?;
            }
            f.write_str("[")?;
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{value}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}
