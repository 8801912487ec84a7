//! Approximate top-k operations trait.

use crate::dtype::Scalar;
use crate::error::{Error, Result};
use crate::ops::Comparator;
use crate::tensor::Tensor;

/// Default recall target of [`ApproxTopKOptions`]
pub const DEFAULT_RECALL_TARGET: f32 = 0.9;

/// Per-call configuration of an approximate top-k
///
/// # Example
///
/// ```
/// # use numr_approx_topk::ops::ApproxTopKOptions;
/// let opts = ApproxTopKOptions::default()
///     .with_recall_target(0.99)
///     .with_aggregate_to_topk(false);
/// assert_eq!(opts.recall_target, 0.99);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ApproxTopKOptions {
    /// Expected fraction of the true top-k that survives windowing, in `(0, 1]`
    pub recall_target: f32,
    /// Sort the candidates and keep exactly `top_k` of them
    pub aggregate_to_topk: bool,
    /// Logical size of the reduction dimension when the operands hold one shard of it
    pub reduction_input_size_override: Option<usize>,
}

impl Default for ApproxTopKOptions {
    fn default() -> Self {
        Self {
            recall_target: DEFAULT_RECALL_TARGET,
            aggregate_to_topk: true,
            reduction_input_size_override: None,
        }
    }
}

impl ApproxTopKOptions {
    /// Set the recall target
    pub fn with_recall_target(mut self, recall_target: f32) -> Self {
        self.recall_target = recall_target;
        self
    }

    /// Enable or disable the final exact aggregation
    pub fn with_aggregate_to_topk(mut self, aggregate_to_topk: bool) -> Self {
        self.aggregate_to_topk = aggregate_to_topk;
        self
    }

    /// Model recall over a logical reduction size larger than the operands' own
    pub fn with_reduction_input_size_override(mut self, logical_size: usize) -> Self {
        self.reduction_input_size_override = Some(logical_size);
        self
    }
}

/// Winners of the windowed top-1 reduction
///
/// Shaped like the operands with the reduction dimension replaced by the number
/// of windows. `positions` holds, for every slot, the index along the reduction
/// dimension of the winning input element, or `-1` when no element of the
/// window ranked ahead of the init values.
#[derive(Clone, Debug)]
pub struct CandidateSet {
    pub(crate) values: Vec<Tensor>,
    pub(crate) positions: Tensor,
    pub(crate) reduction_dim: usize,
    pub(crate) window_size: usize,
}

impl CandidateSet {
    /// One tensor per operand
    pub fn values(&self) -> &[Tensor] {
        &self.values
    }

    /// I64 positions of the winners along the reduction dimension
    pub fn positions(&self) -> &Tensor {
        &self.positions
    }

    /// Normalized reduction dimension
    pub fn reduction_dim(&self) -> usize {
        self.reduction_dim
    }

    /// Window size the candidates were reduced with
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of candidates per non-reduced coordinate
    pub fn num_candidates(&self) -> usize {
        self.positions.shape()[self.reduction_dim]
    }
}

/// Result of an approximate top-k
#[derive(Clone, Debug)]
pub struct ApproxTopKOutput {
    /// One tensor per operand
    pub values: Vec<Tensor>,
    /// I64 positions of the selected elements along the reduction dimension
    /// (`-1` for slots filled from the init values)
    pub positions: Tensor,
}

impl From<CandidateSet> for ApproxTopKOutput {
    fn from(candidates: CandidateSet) -> Self {
        Self {
            values: candidates.values,
            positions: candidates.positions,
        }
    }
}

/// Approximate top-k operations trait
///
/// The reduction dimension is split into windows, each window is reduced to its
/// top-1 element under a [`Comparator`], and the surviving candidates are
/// optionally sorted and truncated to exactly `top_k`. Window size is derived
/// from a recall target (see [`solve_reduction_geometry`](crate::algorithm::recall::solve_reduction_geometry)).
pub trait ApproxTopKOps {
    /// Approximate top-k of co-indexed operands.
    ///
    /// # Arguments
    ///
    /// * `operands` - N tensors of identical shape; dtypes may differ
    /// * `init_values` - N identity values, one per operand and of its dtype
    /// * `top_k` - Number of elements wanted, in `[1, dim_size]`
    /// * `reduction_dim` - Dimension to reduce (supports negative indexing)
    /// * `comparator` - Strict ordering over operand tuples
    /// * `options` - Recall target and aggregation switch
    ///
    /// # Returns
    ///
    /// N tensors with the reduction dimension replaced by `top_k` when
    /// aggregating, otherwise by the number of windows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for any malformed configuration, before any
    /// reduction work is done.
    ///
    /// # Example
    ///
    /// ```
    /// # use numr_approx_topk::prelude::*;
    /// let client = CpuClient::new();
    /// let x = Tensor::from_slice(&[5.0f32, 3.0, 9.0, 1.0, 7.0, 2.0], &[6]);
    /// let out = client.approx_top_k(
    ///     &[x],
    ///     &[Scalar::F32(f32::NEG_INFINITY)],
    ///     2,
    ///     0,
    ///     &Greater::default(),
    ///     ApproxTopKOptions::default().with_recall_target(1.0),
    /// )?;
    /// assert_eq!(out[0].to_vec::<f32>(), vec![9.0, 7.0]);
    /// # Ok::<(), numr_approx_topk::error::Error>(())
    /// ```
    fn approx_top_k<C: Comparator + ?Sized>(
        &self,
        operands: &[Tensor],
        init_values: &[Scalar],
        top_k: usize,
        reduction_dim: isize,
        comparator: &C,
        options: ApproxTopKOptions,
    ) -> Result<Vec<Tensor>> {
        self.approx_top_k_with_positions(
            operands,
            init_values,
            top_k,
            reduction_dim,
            comparator,
            options,
        )
        .map(|out| out.values)
    }

    /// Same as [`Self::approx_top_k`], also returning the positions of the
    /// selected elements along the reduction dimension.
    fn approx_top_k_with_positions<C: Comparator + ?Sized>(
        &self,
        operands: &[Tensor],
        init_values: &[Scalar],
        top_k: usize,
        reduction_dim: isize,
        comparator: &C,
        options: ApproxTopKOptions,
    ) -> Result<ApproxTopKOutput> {
        let _ = (
            operands,
            init_values,
            top_k,
            reduction_dim,
            comparator,
            options,
        );
        Err(Error::NotImplemented {
            feature: "ApproxTopKOps::approx_top_k_with_positions",
        })
    }

    /// Reduce every window of `window_size` elements along `reduction_dim` to its
    /// top-1 element.
    ///
    /// The last window may be shorter. Ties keep the earlier position.
    fn reduce_windows<C: Comparator + ?Sized>(
        &self,
        operands: &[Tensor],
        init_values: &[Scalar],
        reduction_dim: isize,
        window_size: usize,
        comparator: &C,
    ) -> Result<CandidateSet> {
        let _ = (operands, init_values, reduction_dim, window_size, comparator);
        Err(Error::NotImplemented {
            feature: "ApproxTopKOps::reduce_windows",
        })
    }

    /// Sort candidates and keep exactly `top_k` per non-reduced coordinate.
    ///
    /// Ties keep the candidate with the smaller original position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if there are fewer than `top_k` candidates.
    fn aggregate_candidates<C: Comparator + ?Sized>(
        &self,
        candidates: &CandidateSet,
        top_k: usize,
        comparator: &C,
    ) -> Result<ApproxTopKOutput> {
        let _ = (candidates, top_k, comparator);
        Err(Error::NotImplemented {
            feature: "ApproxTopKOps::aggregate_candidates",
        })
    }
}
