//! # numr-approx-topk
//!
//! **Approximate top-k selection over tensors with a recall target.**
//!
//! The reduction dimension is split into windows and each window keeps its
//! single best element. With `m` windows, a true top-k element survives with
//! probability `(1 - 1/m)^(k-1)`, so the window count is chosen as the
//! smallest power-of-two geometry meeting the requested recall. The surviving
//! candidates are optionally sorted and truncated to exactly `k`.
//!
//! ## Features
//!
//! - **Multi-operand**: every operand is permuted together; the first usually
//!   carries values and the others payloads such as indices
//! - **Custom ordering**: any strict-weak-order [`Comparator`](ops::Comparator)
//!   over operand tuples
//! - **Sharding aware**: recall can be modelled over a logical size larger than
//!   the local shard
//! - **Deterministic**: ties break toward the smaller original position, and
//!   parallel runs match sequential ones
//!
//! ## Quick Start
//!
//! ```
//! use numr_approx_topk::prelude::*;
//!
//! # fn main() -> numr_approx_topk::error::Result<()> {
//! let client = CpuClient::new();
//! let scores = Tensor::from_slice(&[0.1f32, 0.9, 0.4, 0.7, 0.2, 0.8], &[6]);
//!
//! let top = client.approx_top_k(
//!     &[scores],
//!     &[Scalar::F32(f32::NEG_INFINITY)],
//!     2,
//!     -1,
//!     &Greater::default(),
//!     ApproxTopKOptions::default().with_recall_target(1.0),
//! )?;
//! assert_eq!(top[0].to_vec::<f32>(), vec![0.9, 0.8]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): Multi-threaded CPU kernels
//! - `f16`: Half-precision operands (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

pub use algorithm::recall::{
    approx_top_k_reduction_output_size, approx_top_k_reduction_output_size_with_override,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{
        ApproxTopKOps, ApproxTopKOptions, ApproxTopKOutput, CandidateSet, Comparator, Greater,
        Less,
    };
    pub use crate::tensor::{Shape, Tensor};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, ParallelismConfig};
}
