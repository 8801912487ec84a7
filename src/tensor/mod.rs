//! Tensor types
//!
//! This module provides the host-resident `Tensor` used for operands, candidate
//! sets and outputs of the approximate top-k pipeline.

mod core;
mod shape;
mod storage;

pub use core::Tensor;
pub(crate) use core::ScalarView;
pub use shape::Shape;
pub use storage::Storage;
