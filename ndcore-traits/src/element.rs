//! Element kinds storable in an `NdArray`.
//!
//! The set of element kinds is closed: booleans, the primitive integers and
//! floats, and `Complex<f32>` / `Complex<f64>`. Every kind supplies its own
//! default value (`Default`), its own equality (`PartialEq`), and a
//! compile-time [`ElementKind`] tag, so containers never hardcode
//! per-kind behaviour.
//!
//! # Equality
//!
//! Equality is exact. Floats compare by value (`0.0 == -0.0`, `NaN != NaN`),
//! complex numbers compare componentwise. No tolerance is applied at this
//! layer.

use std::fmt;

use num_complex::Complex;

/// Broad category of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    Complex,
}

impl ElementKind {
    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self, ElementKind::SignedInt | ElementKind::UnsignedInt)
    }

    /// True for kinds that can represent negative values.
    #[inline]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ElementKind::SignedInt | ElementKind::Float | ElementKind::Complex
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Bool => "bool",
            ElementKind::SignedInt => "signed integer",
            ElementKind::UnsignedInt => "unsigned integer",
            ElementKind::Float => "float",
            ElementKind::Complex => "complex",
        };
        f.write_str(name)
    }
}

/// Trait implemented by every type that can be stored in an array.
///
/// `Default` supplies the value used for freshly allocated buffers
/// (zero for numbers, `false` for booleans).
pub trait Element:
    Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Category tag.
    const KIND: ElementKind;

    /// Short type name, e.g. `"f64"` or `"complex128"`.
    const NAME: &'static str;

    /// For integers the number of non-sign bits, for floats the number of
    /// mantissa digits, for complex numbers that of one component.
    const DIGITS: u32;
}

macro_rules! impl_element {
    ($kind:expr, $($t:ty => $digits:expr),* $(,)?) => {
        $(
            impl Element for $t {
                const KIND: ElementKind = $kind;
                const NAME: &'static str = stringify!($t);
                const DIGITS: u32 = $digits;
            }
        )*
    };
}

impl_element!(
    ElementKind::SignedInt,
    i8 => i8::BITS - 1,
    i16 => i16::BITS - 1,
    i32 => i32::BITS - 1,
    i64 => i64::BITS - 1,
    isize => isize::BITS - 1,
);

impl_element!(
    ElementKind::UnsignedInt,
    u8 => u8::BITS,
    u16 => u16::BITS,
    u32 => u32::BITS,
    u64 => u64::BITS,
    usize => usize::BITS,
);

impl_element!(
    ElementKind::Float,
    f32 => f32::MANTISSA_DIGITS,
    f64 => f64::MANTISSA_DIGITS,
);

impl Element for bool {
    const KIND: ElementKind = ElementKind::Bool;
    const NAME: &'static str = "bool";
    const DIGITS: u32 = 1;
}

impl Element for Complex<f32> {
    const KIND: ElementKind = ElementKind::Complex;
    const NAME: &'static str = "complex64";
    const DIGITS: u32 = f32::MANTISSA_DIGITS;
}

impl Element for Complex<f64> {
    const KIND: ElementKind = ElementKind::Complex;
    const NAME: &'static str = "complex128";
    const DIGITS: u32 = f64::MANTISSA_DIGITS;
}
