//! Static information about an element kind.

use std::marker::PhantomData;

use num_traits::{Bounded, Float};

use crate::element::{Element, ElementKind};

/// Holds info about the element type `T`.
///
/// Never instantiated; all queries are associated functions.
///
/// ```
/// use ndcore_traits::DtypeInfo;
///
/// assert!(DtypeInfo::<i16>::is_integer());
/// assert_eq!(DtypeInfo::<i16>::bits(), 15);
/// assert_eq!(DtypeInfo::<u8>::max(), 255);
/// ```
pub struct DtypeInfo<T>(PhantomData<T>);

impl<T: Element> DtypeInfo<T> {
    #[inline]
    pub fn kind() -> ElementKind {
        T::KIND
    }

    #[inline]
    pub fn name() -> &'static str {
        T::NAME
    }

    /// Non-sign bits for integers, mantissa digits for floats.
    #[inline]
    pub fn bits() -> u32 {
        T::DIGITS
    }

    #[inline]
    pub fn is_integer() -> bool {
        T::KIND.is_integer()
    }

    #[inline]
    pub fn is_signed() -> bool {
        T::KIND.is_signed()
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn size_of() -> usize {
        std::mem::size_of::<T>()
    }
}

impl<T: Element + Bounded> DtypeInfo<T> {
    /// Smallest finite value.
    #[inline]
    pub fn min() -> T {
        T::min_value()
    }

    /// Largest finite value.
    #[inline]
    pub fn max() -> T {
        T::max_value()
    }
}

impl<T: Element + Float> DtypeInfo<T> {
    /// Difference between 1 and the next representable value.
    #[inline]
    pub fn epsilon() -> T {
        T::epsilon()
    }
}
