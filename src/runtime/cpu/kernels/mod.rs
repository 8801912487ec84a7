//! CPU kernel implementations
//!
//! Kernels work on contiguous operands viewed as `[outer, dim, inner]` and
//! produce index tensors; values are materialised afterwards with
//! [`gather::gather_along_dim`].

pub(crate) mod aggregate;
pub(crate) mod gather;
pub(crate) mod window_reduce;

pub(crate) use aggregate::aggregate_kernel;
pub(crate) use gather::{GatherLayout, gather_along_dim};
pub(crate) use window_reduce::{ReduceInput, reduce_windows_kernel};
