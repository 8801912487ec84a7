//! Tensor operations
//!
//! This module defines the approximate top-k operation trait, the comparators it
//! is parameterised by, and the axis helpers shared by the kernels.
//!
//! # Design
//!
//! Operations are defined as traits that are implemented by a backend client.
//!
//! ```text
//! CpuClient
//!   └── implements ApproxTopKOps
//!         ├── approx_top_k / approx_top_k_with_positions  (full pipeline)
//!         ├── reduce_windows                              (windowed top-1)
//!         └── aggregate_candidates                        (exact sort + truncate)
//! ```

mod comparator;
mod reduce;
mod traits;

pub use comparator::{Comparator, Greater, Less};
pub(crate) use reduce::flat_index;
pub use reduce::{compute_reduce_strides, normalize_dim, topk_output_shape};
pub use traits::*;
