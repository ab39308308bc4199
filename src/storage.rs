//! Backing buffers: exclusively owned or borrowed from the caller.

use crate::{NdError, Result};

/// Policy used when an array is built around an existing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Deep-copy the buffer into storage owned by the array.
    Copy,
    /// Reference the caller's buffer without copying. Writes through the
    /// array are visible in the buffer and nothing is freed on drop.
    View,
}

/// The buffer behind an `NdArray`.
///
/// Its length always equals the array's cached size: views are trimmed to
/// `rows * cols` elements when they are created.
pub(crate) enum Storage<'a, T> {
    Owned(Vec<T>),
    View(&'a mut [T]),
}

impl<'a, T> Storage<'a, T> {
    #[inline]
    pub(crate) fn ownership(&self) -> Ownership {
        match self {
            Storage::Owned(_) => Ownership::Copy,
            Storage::View(_) => Ownership::View,
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        match self {
            Storage::Owned(data) => data,
            Storage::View(data) => data,
        }
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Storage::Owned(data) => data,
            Storage::View(data) => data,
        }
    }
}

/// Allocate `len` copies of `value`, reporting allocation failure as an error.
pub(crate) fn allocate<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| NdError::AllocationError { elements: len })?;
    data.resize(len, value);
    Ok(data)
}

/// Copy a slice into freshly allocated storage.
pub(crate) fn allocate_from_slice<T: Clone>(src: &[T]) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(src.len())
        .map_err(|_| NdError::AllocationError {
            elements: src.len(),
        })?;
    data.extend_from_slice(src);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate() {
        let v = allocate(4, 0u8).unwrap();
        assert_eq!(v, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_allocate_failure() {
        let err = allocate(usize::MAX, 0u64).unwrap_err();
        assert!(matches!(err, NdError::AllocationError { elements } if elements == usize::MAX));
    }

    #[test]
    fn test_ownership_tag() {
        let owned: Storage<'_, i32> = Storage::Owned(vec![1, 2]);
        assert_eq!(owned.ownership(), Ownership::Copy);

        let mut buf = [1, 2, 3];
        let mut view = Storage::View(&mut buf[..]);
        assert_eq!(view.ownership(), Ownership::View);
        view.as_mut_slice()[0] = 10;
        assert_eq!(view.as_slice(), &[10, 2, 3]);
        assert_eq!(buf[0], 10);
    }
}
