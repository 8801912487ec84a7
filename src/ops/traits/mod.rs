//! Operation traits.
//!
//! Implementations are in the backend-specific modules (`runtime/cpu/`).

mod approx_topk;

pub use approx_topk::{
    ApproxTopKOps, ApproxTopKOptions, ApproxTopKOutput, CandidateSet, DEFAULT_RECALL_TARGET,
};
