//! Approximate top-k for the CPU runtime

use super::kernels::{
    GatherLayout, ReduceInput, aggregate_kernel, gather_along_dim, reduce_windows_kernel,
};
use super::CpuClient;
use crate::algorithm::recall::solve_reduction_geometry;
use crate::algorithm::window::partition_windows;
use crate::dtype::Scalar;
use crate::error::{Error, Result};
use crate::ops::{
    ApproxTopKOps, ApproxTopKOptions, ApproxTopKOutput, CandidateSet, Comparator,
    compute_reduce_strides, normalize_dim, topk_output_shape,
};
use crate::tensor::{ScalarView, Tensor};
use tracing::{debug, trace};

/// Check the operand set against its init values and comparator, then resolve
/// the reduction dimension.
fn validate_operands<C: Comparator + ?Sized>(
    operands: &[Tensor],
    init_values: &[Scalar],
    reduction_dim: isize,
    comparator: &C,
) -> Result<usize> {
    let Some(first) = operands.first() else {
        return Err(Error::invalid_argument(
            "operands",
            "at least one operand is required",
        ));
    };
    if init_values.len() != operands.len() {
        return Err(Error::invalid_argument(
            "init_values",
            format!(
                "{} init values for {} operands",
                init_values.len(),
                operands.len()
            ),
        ));
    }
    for (i, (operand, init)) in operands.iter().zip(init_values).enumerate() {
        if operand.shape() != first.shape() {
            return Err(Error::invalid_argument(
                "operands",
                format!(
                    "operand {i} has shape {:?}, expected {:?}",
                    operand.shape(),
                    first.shape()
                ),
            ));
        }
        if init.dtype() != operand.dtype() {
            return Err(Error::invalid_argument(
                "init_values",
                format!(
                    "init value {i} is {}, operand is {}",
                    init.dtype(),
                    operand.dtype()
                ),
            ));
        }
    }
    comparator.validate(operands.len())?;
    normalize_dim(reduction_dim, first.ndim()).ok_or_else(|| {
        Error::invalid_argument(
            "reduction_dim",
            format!(
                "dimension {reduction_dim} is out of range for rank {}",
                first.ndim()
            ),
        )
    })
}

/// Windowed top-1 reduction of already validated operands.
fn reduce_windows_validated<C: Comparator + ?Sized>(
    client: &CpuClient,
    operands: &[Tensor],
    init_values: &[Scalar],
    dim: usize,
    window_size: usize,
    comparator: &C,
) -> Result<CandidateSet> {
    let shape = operands[0].shape();
    let (outer_size, dim_size, inner_size) = compute_reduce_strides(shape, dim);
    let windows = partition_windows(dim_size, window_size)?;
    trace!(
        outer_size,
        dim_size,
        inner_size,
        window_size,
        num_windows = windows.len(),
        "reducing windows"
    );

    let views: Vec<ScalarView<'_>> = operands.iter().map(Tensor::scalar_view).collect();
    let input = ReduceInput {
        views: &views,
        init: init_values,
        outer_size,
        dim_size,
        inner_size,
    };
    let positions = reduce_windows_kernel(client, &input, &windows, comparator);

    let out_shape = topk_output_shape(shape, dim, windows.len());
    let layout = GatherLayout {
        outer_size,
        src_dim: dim_size,
        out_dim: windows.len(),
        inner_size,
    };
    let values = operands
        .iter()
        .zip(init_values)
        .map(|(operand, &init)| gather_along_dim(operand, &positions, Some(init), layout, &out_shape))
        .collect::<Result<Vec<_>>>()?;

    Ok(CandidateSet {
        values,
        positions: Tensor::try_from_vec(positions, &out_shape)?,
        reduction_dim: dim,
        window_size,
    })
}

/// Sort and truncate candidates to exactly `top_k` per coordinate.
fn aggregate_candidates_impl<C: Comparator + ?Sized>(
    client: &CpuClient,
    candidates: &CandidateSet,
    top_k: usize,
    comparator: &C,
) -> Result<ApproxTopKOutput> {
    let num_candidates = candidates.num_candidates();
    if top_k == 0 {
        return Err(Error::invalid_argument("top_k", "must be at least 1"));
    }
    if num_candidates < top_k {
        return Err(Error::invalid_argument(
            "top_k",
            format!("only {num_candidates} candidates for top_k = {top_k}"),
        ));
    }
    comparator.validate(candidates.values.len())?;

    let dim = candidates.reduction_dim;
    let shape = candidates.positions.shape();
    let (outer_size, _, inner_size) = compute_reduce_strides(shape, dim);
    let positions = candidates.positions.as_slice::<i64>()?;
    trace!(outer_size, inner_size, num_candidates, top_k, "aggregating candidates");

    let views: Vec<ScalarView<'_>> = candidates.values.iter().map(Tensor::scalar_view).collect();
    // Candidate tuples are read directly; the init values play no part here.
    let input = ReduceInput {
        views: &views,
        init: &[],
        outer_size,
        dim_size: num_candidates,
        inner_size,
    };
    let slots = aggregate_kernel(client, &input, positions, top_k, comparator);

    let out_shape = topk_output_shape(shape, dim, top_k);
    let layout = GatherLayout {
        outer_size,
        src_dim: num_candidates,
        out_dim: top_k,
        inner_size,
    };
    let values = candidates
        .values
        .iter()
        .map(|c| gather_along_dim(c, &slots, None, layout, &out_shape))
        .collect::<Result<Vec<_>>>()?;
    let positions = gather_along_dim(&candidates.positions, &slots, None, layout, &out_shape)?;

    Ok(ApproxTopKOutput { values, positions })
}

impl ApproxTopKOps for CpuClient {
    fn approx_top_k_with_positions<C: Comparator + ?Sized>(
        &self,
        operands: &[Tensor],
        init_values: &[Scalar],
        top_k: usize,
        reduction_dim: isize,
        comparator: &C,
        options: ApproxTopKOptions,
    ) -> Result<ApproxTopKOutput> {
        let dim = validate_operands(operands, init_values, reduction_dim, comparator)?;
        let shape = operands[0].shape();
        let geometry = solve_reduction_geometry(
            shape[dim],
            shape.len(),
            top_k,
            options.recall_target,
            options.aggregate_to_topk,
            options.reduction_input_size_override,
        )?;
        debug!(
            shape = ?shape,
            dim,
            top_k,
            window_size = geometry.window_size,
            aggregate = options.aggregate_to_topk,
            "approx top-k"
        );

        let candidates = reduce_windows_validated(
            self,
            operands,
            init_values,
            dim,
            geometry.window_size,
            comparator,
        )?;
        if options.aggregate_to_topk {
            aggregate_candidates_impl(self, &candidates, top_k, comparator)
        } else {
            Ok(candidates.into())
        }
    }

    fn reduce_windows<C: Comparator + ?Sized>(
        &self,
        operands: &[Tensor],
        init_values: &[Scalar],
        reduction_dim: isize,
        window_size: usize,
        comparator: &C,
    ) -> Result<CandidateSet> {
        let dim = validate_operands(operands, init_values, reduction_dim, comparator)?;
        reduce_windows_validated(self, operands, init_values, dim, window_size, comparator)
    }

    fn aggregate_candidates<C: Comparator + ?Sized>(
        &self,
        candidates: &CandidateSet,
        top_k: usize,
        comparator: &C,
    ) -> Result<ApproxTopKOutput> {
        aggregate_candidates_impl(self, candidates, top_k, comparator)
    }
}
