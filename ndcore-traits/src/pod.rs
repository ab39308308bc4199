//! Plain-old-data representations used for binary persistence.
//!
//! Raw buffers are written by casting to bytes with `bytemuck`. Primitive
//! numbers are already `Pod`; `bool` travels as a `u8` and `Complex<T>` as a
//! `repr(C)` `[re, im]` pair.

use bytemuck::{Pod, Zeroable};
use num_complex::Complex;

use crate::element::Element;

/// Element kinds with a fixed-width binary representation.
pub trait Persist: Element {
    /// On-disk representation.
    type Pod: Pod;

    fn to_pod(self) -> Self::Pod;

    fn from_pod(pod: Self::Pod) -> Self;
}

macro_rules! impl_persist_identity {
    ($($t:ty),*) => {
        $(
            impl Persist for $t {
                type Pod = $t;

                #[inline(always)]
                fn to_pod(self) -> $t {
                    self
                }

                #[inline(always)]
                fn from_pod(pod: $t) -> $t {
                    pod
                }
            }
        )*
    };
}

impl_persist_identity!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Persist for bool {
    type Pod = u8;

    #[inline(always)]
    fn to_pod(self) -> u8 {
        self as u8
    }

    /// Any non-zero byte reads back as `true`.
    #[inline(always)]
    fn from_pod(pod: u8) -> bool {
        pod != 0
    }
}

/// POD representation of `Complex<f64>`: `[re, im]` with `repr(C)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Zeroable, Pod)]
pub struct PodComplexF64 {
    pub re: f64,
    pub im: f64,
}

/// POD representation of `Complex<f32>`: `[re, im]` with `repr(C)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Zeroable, Pod)]
pub struct PodComplexF32 {
    pub re: f32,
    pub im: f32,
}

impl From<Complex<f64>> for PodComplexF64 {
    fn from(c: Complex<f64>) -> Self {
        PodComplexF64 { re: c.re, im: c.im }
    }
}

impl From<PodComplexF64> for Complex<f64> {
    fn from(p: PodComplexF64) -> Self {
        Complex::new(p.re, p.im)
    }
}

impl From<Complex<f32>> for PodComplexF32 {
    fn from(c: Complex<f32>) -> Self {
        PodComplexF32 { re: c.re, im: c.im }
    }
}

impl From<PodComplexF32> for Complex<f32> {
    fn from(p: PodComplexF32) -> Self {
        Complex::new(p.re, p.im)
    }
}

impl Persist for Complex<f64> {
    type Pod = PodComplexF64;

    #[inline(always)]
    fn to_pod(self) -> PodComplexF64 {
        self.into()
    }

    #[inline(always)]
    fn from_pod(pod: PodComplexF64) -> Self {
        pod.into()
    }
}

impl Persist for Complex<f32> {
    type Pod = PodComplexF32;

    #[inline(always)]
    fn to_pod(self) -> PodComplexF32 {
        self.into()
    }

    #[inline(always)]
    fn from_pod(pod: PodComplexF32) -> Self {
        pod.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::{Complex32, Complex64};

    #[test]
    fn test_pod_complex_layout() {
        assert_eq!(
            std::mem::size_of::<PodComplexF64>(),
            std::mem::size_of::<Complex64>()
        );
        assert_eq!(
            std::mem::size_of::<PodComplexF32>(),
            std::mem::size_of::<Complex32>()
        );
    }

    #[test]
    fn test_complex_bytes() {
        let pod = Complex64::new(1.5, -2.0).to_pod();
        let bytes: &[u8] = bytemuck::bytes_of(&pod);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..8], &1.5f64.to_ne_bytes());
        assert_eq!(&bytes[8..], &(-2.0f64).to_ne_bytes());
    }

    #[test]
    fn test_bool_pod() {
        assert_eq!(true.to_pod(), 1u8);
        assert_eq!(false.to_pod(), 0u8);
        assert!(bool::from_pod(7));
        assert!(!bool::from_pod(0));
    }

    #[test]
    fn test_primitive_identity() {
        assert_eq!(f64::from_pod((-0.25f64).to_pod()), -0.25);
        assert_eq!(i16::from_pod(i16::MIN.to_pod()), i16::MIN);
    }
}
