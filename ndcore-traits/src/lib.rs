//! Shared traits for the ndcore array engine.
//!
//! This crate defines the closed set of element kinds an `NdArray` can hold
//! and the per-kind information the container relies on:
//!
//! - [`Element`]: default value, equality, and kind tag for every element type
//! - [`Numeric`]: element kinds with `0`, `1`, `+` and `*`
//! - [`DtypeInfo`]: static queries (bits, signedness, limits)
//! - [`Persist`]: fixed-width binary representation for dump/load
//!
//! External crates can depend on `ndcore-traits` to write code generic over
//! element kinds without pulling in the container itself.

mod dtype;
mod element;
mod pod;
mod scalar;

pub use dtype::DtypeInfo;
pub use element::{Element, ElementKind};
pub use pod::{Persist, PodComplexF32, PodComplexF64};
pub use scalar::Numeric;
