//! Windowed top-1 reduction kernel
//!
//! Every (outer, window, inner) triple is one independent unit: it scans the
//! positions of its window and keeps the one that ranks first. Units share no
//! mutable state, so they are spread across rayon tasks and gathered back in
//! unit order, which keeps the result identical to the sequential run.

use crate::algorithm::window::Window;
use crate::dtype::Scalar;
use crate::ops::{Comparator, flat_index};
use crate::runtime::cpu::CpuClient;
use crate::tensor::ScalarView;
use smallvec::SmallVec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Operand tuple buffer; most calls reduce a value operand and an index payload
pub(crate) type TupleBuf = SmallVec<[Scalar; 4]>;

/// Operands seen as `[outer_size, dim_size, inner_size]`
pub(crate) struct ReduceInput<'a> {
    pub views: &'a [ScalarView<'a>],
    pub init: &'a [Scalar],
    pub outer_size: usize,
    pub dim_size: usize,
    pub inner_size: usize,
}

impl ReduceInput<'_> {
    #[inline]
    pub(crate) fn load_tuple(&self, flat: usize, out: &mut TupleBuf) {
        out.clear();
        out.extend(self.views.iter().map(|v| v.get(flat)));
    }
}

/// Reduce one window at one non-reduced coordinate.
///
/// Returns the winning position along the reduction dimension, or `-1` when no
/// position ranked ahead of the init tuple.
#[inline]
fn reduce_unit<C: Comparator + ?Sized>(
    input: &ReduceInput<'_>,
    window: Window,
    outer: usize,
    inner: usize,
    comparator: &C,
    best: &mut TupleBuf,
    candidate: &mut TupleBuf,
) -> i64 {
    best.clear();
    best.extend_from_slice(input.init);
    let mut best_pos = -1i64;

    for pos in window.range() {
        let flat = flat_index(outer, pos, inner, input.dim_size, input.inner_size);
        input.load_tuple(flat, candidate);
        // Strictly ahead only: on ties the earlier position stays.
        if comparator.greater(candidate, best) {
            std::mem::swap(best, candidate);
            best_pos = pos as i64;
        }
    }
    best_pos
}

/// Decompose a unit index into `(outer, window, inner)`.
#[inline]
fn unit_coords(unit: usize, num_windows: usize, inner_size: usize) -> (usize, usize, usize) {
    let per_outer = num_windows * inner_size;
    let outer = unit / per_outer;
    let rem = unit % per_outer;
    (outer, rem / inner_size, rem % inner_size)
}

/// Winning positions of every window, laid out as `[outer, num_windows, inner]`.
pub(crate) fn reduce_windows_kernel<C: Comparator + ?Sized>(
    client: &CpuClient,
    input: &ReduceInput<'_>,
    windows: &[Window],
    comparator: &C,
) -> Vec<i64> {
    let num_units = input.outer_size * windows.len() * input.inner_size;

    let run = |unit: usize, best: &mut TupleBuf, candidate: &mut TupleBuf| {
        let (outer, w, inner) = unit_coords(unit, windows.len(), input.inner_size);
        reduce_unit(input, windows[w], outer, inner, comparator, best, candidate)
    };

    #[cfg(feature = "rayon")]
    {
        if num_units > 1 {
            let min_len = client.rayon_min_len();
            return client.install_parallelism(|| {
                (0..num_units)
                    .into_par_iter()
                    .with_min_len(min_len)
                    .map_init(
                        || (TupleBuf::new(), TupleBuf::new()),
                        |(best, candidate), unit| run(unit, best, candidate),
                    )
                    .collect()
            });
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = client;

    let (mut best, mut candidate) = (TupleBuf::new(), TupleBuf::new());
    (0..num_units)
        .map(|unit| run(unit, &mut best, &mut candidate))
        .collect()
}
