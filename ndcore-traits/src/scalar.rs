//! Arithmetic bound for element kinds.

use crate::element::Element;

/// Element kinds with additive and multiplicative identities.
///
/// `bool` is an [`Element`] but not a `Numeric`; operations such as
/// `ones()` are only offered where a `1` exists.
pub trait Numeric:
    Element
    + std::ops::Mul<Output = Self>
    + std::ops::Add<Output = Self>
    + num_traits::Zero
    + num_traits::One
{
}

impl<T> Numeric for T where
    T: Element
        + std::ops::Mul<Output = T>
        + std::ops::Add<Output = T>
        + num_traits::Zero
        + num_traits::One
{
}
