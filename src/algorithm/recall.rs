//! Window geometry from a recall target
//!
//! # Occupancy model
//!
//! Split the reduction dimension into `m` windows and keep the top-1 of each.
//! A true top-k element survives when none of the other `k - 1` true top-k
//! elements shares its window. Treating the true top-k positions as a uniformly
//! random k-subset, each other element lands in a given window with probability
//! `1 / m`, so the expected recall is
//!
//! ```text
//! recall(m) = (1 - 1/m)^(k - 1)  ~=  exp((1 - k) / m)
//! ```
//!
//! which is increasing in `m`. Inverting the approximation gives
//! `m ~= (k - 1) / -ln(recall)`: about `10k` windows for a 0.9 target and
//! `100k` for 0.99.
//!
//! The solver takes the smallest `m` whose recall reaches the target (binary
//! search over the monotone curve), rounds the window size `n / m` down to a
//! power of two so the reduction maps onto a tree of depth `log2(window)`, and
//! reports `ceil(n / window)` windows.

use crate::error::{Error, Result};
use tracing::debug;

/// Geometry of one windowed top-1 reduction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReductionGeometry {
    /// Physical size of the reduction dimension
    pub input_size: usize,
    /// Size of the reduction dimension in the output
    pub output_size: usize,
    /// Reduction amount in log2 form; `None` when the output is not windowed
    /// (`top_k == 1` or aggregation enabled)
    pub log2_reduction: Option<u32>,
    /// Window size the reducer runs with
    pub window_size: usize,
}

impl ReductionGeometry {
    /// `(output_size, log2_reduction)` with `-1` standing for "not windowed"
    pub fn output_size_pair(&self) -> (usize, i64) {
        (
            self.output_size,
            self.log2_reduction.map_or(-1, |log2| log2 as i64),
        )
    }

    /// Number of windows the reducer produces
    pub fn num_windows(&self) -> usize {
        self.input_size.div_ceil(self.window_size)
    }
}

/// Expected fraction of the true top-k kept when reducing with `num_windows` windows.
pub fn expected_recall(num_windows: usize, top_k: usize) -> f64 {
    if top_k <= 1 {
        return 1.0;
    }
    if num_windows == 0 {
        return 0.0;
    }
    let collisions = (top_k - 1) as f64;
    (collisions * (-1.0 / num_windows as f64).ln_1p()).exp()
}

/// Smallest window count in `[1, input_size]` whose expected recall reaches
/// `recall_target`, or `input_size` when none does.
fn min_windows_for_recall(input_size: usize, top_k: usize, recall_target: f64) -> usize {
    if expected_recall(input_size, top_k) < recall_target {
        return input_size;
    }
    let (mut lo, mut hi) = (1usize, input_size);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if expected_recall(mid, top_k) >= recall_target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

#[inline]
fn floor_log2(x: usize) -> u32 {
    usize::BITS - 1 - x.leading_zeros()
}

fn validate(
    input_size: usize,
    rank: usize,
    top_k: usize,
    recall_target: f32,
    input_size_override: Option<usize>,
) -> Result<()> {
    if rank == 0 {
        return Err(Error::invalid_argument(
            "rank",
            "operands must have at least one dimension to reduce",
        ));
    }
    if !(recall_target > 0.0 && recall_target <= 1.0) {
        return Err(Error::invalid_argument(
            "recall_target",
            format!("{recall_target} is outside (0, 1]"),
        ));
    }
    if top_k == 0 {
        return Err(Error::invalid_argument("top_k", "must be at least 1"));
    }
    if top_k > input_size {
        return Err(Error::invalid_argument(
            "top_k",
            format!("k ({top_k}) cannot be greater than input size ({input_size})"),
        ));
    }
    if let Some(logical) = input_size_override.filter(|&logical| logical < input_size) {
        return Err(Error::invalid_argument(
            "reduction_input_size_override",
            format!("logical size {logical} is smaller than input size {input_size}"),
        ));
    }
    Ok(())
}

/// Window geometry that keeps the expected recall at or above the target.
fn windowed_geometry(
    input_size: usize,
    top_k: usize,
    recall_target: f32,
    input_size_override: Option<usize>,
) -> (u32, usize) {
    let logical_size = input_size_override.unwrap_or(input_size);
    let windows = min_windows_for_recall(logical_size, top_k, recall_target as f64).max(top_k);

    let mut log2 = floor_log2(logical_size / windows);
    // A shard never gets a window wider than itself, and must still yield top_k candidates.
    while log2 > 0 && (1usize << log2) > input_size {
        log2 -= 1;
    }
    while log2 > 0 && input_size.div_ceil(1usize << log2) < top_k {
        log2 -= 1;
    }
    (log2, 1usize << log2)
}

/// Solve the reduction geometry for one approximate top-k.
///
/// # Arguments
///
/// * `input_size` - Size of the reduction dimension
/// * `rank` - Rank of the operands (must be at least 1)
/// * `top_k` - Number of elements wanted, in `[1, input_size]`
/// * `recall_target` - Target expected recall, in `(0, 1]`
/// * `aggregate_to_topk` - Whether the candidates get trimmed to exactly `top_k`
/// * `input_size_override` - Logical reduction size when the operands are a shard
///
/// # Returns
///
/// - `top_k == 1`: output 1, not windowed, a single window spanning the input.
/// - `aggregate_to_topk`: output `top_k`, not windowed; the window size is that
///   of the non-aggregated solve.
/// - otherwise: output `ceil(input_size / window)` with a power-of-two window.
///
/// # Errors
///
/// `InvalidArgument` if any argument is outside its range.
pub fn solve_reduction_geometry(
    input_size: usize,
    rank: usize,
    top_k: usize,
    recall_target: f32,
    aggregate_to_topk: bool,
    input_size_override: Option<usize>,
) -> Result<ReductionGeometry> {
    validate(input_size, rank, top_k, recall_target, input_size_override)?;

    if top_k == 1 {
        return Ok(ReductionGeometry {
            input_size,
            output_size: 1,
            log2_reduction: None,
            window_size: input_size,
        });
    }

    let (log2, window_size) =
        windowed_geometry(input_size, top_k, recall_target, input_size_override);
    let num_windows = input_size.div_ceil(window_size);

    debug!(
        input_size,
        top_k,
        recall_target,
        window_size,
        num_windows,
        recall = expected_recall(num_windows, top_k),
        "solved approx top-k window geometry"
    );

    if aggregate_to_topk {
        return Ok(ReductionGeometry {
            input_size,
            output_size: top_k,
            log2_reduction: None,
            window_size,
        });
    }

    Ok(ReductionGeometry {
        input_size,
        output_size: num_windows,
        log2_reduction: Some(log2),
        window_size,
    })
}

/// Output size of the reduction dimension and the reduction amount in log2 form.
///
/// The second element is `-1` when the output is not windowed, i.e. when
/// `top_k == 1` or `aggregate_to_topk` is set; the first is then `top_k`.
/// Useful to size output buffers before running the reduction.
///
/// # Example
///
/// ```
/// # use numr_approx_topk::approx_top_k_reduction_output_size;
/// let (size, log2) = approx_top_k_reduction_output_size(100_000, 1, 100, 0.9, false)?;
/// assert_eq!((size, log2), (1563, 6));
/// assert_eq!(approx_top_k_reduction_output_size(100_000, 1, 100, 0.9, true)?, (100, -1));
/// # Ok::<(), numr_approx_topk::error::Error>(())
/// ```
pub fn approx_top_k_reduction_output_size(
    input_size: usize,
    rank: usize,
    top_k: usize,
    recall_target: f32,
    aggregate_to_topk: bool,
) -> Result<(usize, i64)> {
    approx_top_k_reduction_output_size_with_override(
        input_size,
        rank,
        top_k,
        recall_target,
        aggregate_to_topk,
        None,
    )
}

/// [`approx_top_k_reduction_output_size`] for a shard of a larger logical
/// reduction dimension of size `input_size_override`.
pub fn approx_top_k_reduction_output_size_with_override(
    input_size: usize,
    rank: usize,
    top_k: usize,
    recall_target: f32,
    aggregate_to_topk: bool,
    input_size_override: Option<usize>,
) -> Result<(usize, i64)> {
    solve_reduction_geometry(
        input_size,
        rank,
        top_k,
        recall_target,
        aggregate_to_topk,
        input_size_override,
    )
    .map(|geometry| geometry.output_size_pair())
}
