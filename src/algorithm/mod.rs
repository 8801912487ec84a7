//! Backend-independent algorithms
//!
//! - [`recall`] - Window geometry solved from a recall target
//! - [`window`] - Partitioning of the reduction dimension into windows
//!
//! Both are pure functions of scalar configuration; the kernels that consume
//! their output live in the backend modules.

pub mod recall;
pub mod window;

pub use recall::{
    ReductionGeometry, approx_top_k_reduction_output_size,
    approx_top_k_reduction_output_size_with_override, expected_recall, solve_reduction_geometry,
};
pub use window::{Window, num_windows, partition_windows};
