//! CPU runtime implementation
//!
//! The CPU runtime is the reference implementation of approximate top-k.
//! With the `rayon` feature, independent windows and output coordinates are
//! spread across a rayon pool; results are identical to a sequential run.

mod approx_topk;
mod client;
pub(crate) mod kernels;

pub use client::{CpuClient, DEFAULT_RAYON_MIN_LEN, ParallelismConfig};
