//! Multi-dimensional tensors over flat memory.
//!
//! The crate is layered bottom-up: [`layout`] holds the pure shape/stride
//! arithmetic, [`view`] provides read-only and mutable strided windows over
//! borrowed memory, [`tensor`] owns reference-counted storage and issues
//! aliasing slices into it, and [`broadcast`]/[`transform`] reinterpret or
//! remap shapes on top. Numeric work funnels into the flat-sequence kernels
//! of the `ndtensor-kernels` crate, re-exported here as [`kernels`].

pub mod broadcast;
mod display;
pub mod error;
pub mod layout;
mod ops;
pub mod tensor;
pub mod transform;
pub mod view;

#[cfg(test)]
mod property_tests;

pub use ndtensor_kernels as kernels;

pub use error::{Result, TensorError};
pub use layout::Dims;
pub use tensor::{PinGuard, Tensor};
pub use transform::{concat, split, stack};
pub use view::{AxisIter, TensorView, TensorViewMut};
