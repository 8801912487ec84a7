//! Exact aggregation of windowed candidates
//!
//! Each non-reduced coordinate is handled independently: its candidates are
//! ordered by the comparator, ties broken by original position, and the first
//! `top_k` kept.

use super::window_reduce::{ReduceInput, TupleBuf};
use crate::ops::{Comparator, flat_index};
use crate::runtime::cpu::CpuClient;
use std::cmp::Ordering;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

struct Entry {
    tuple: TupleBuf,
    slot: usize,
    position: i64,
}

/// Init-filled slots (`-1`) rank after every real position.
#[inline]
fn tie_rank(position: i64) -> u64 {
    u64::try_from(position).unwrap_or(u64::MAX)
}

#[inline]
fn entry_order<C: Comparator + ?Sized>(comparator: &C, a: &Entry, b: &Entry) -> Ordering {
    comparator
        .rank_order(&a.tuple, &b.tuple)
        .then_with(|| tie_rank(a.position).cmp(&tie_rank(b.position)))
}

/// Candidate slots of the first `top_k` entries at one coordinate, best first.
fn select_coordinate<C: Comparator + ?Sized>(
    input: &ReduceInput<'_>,
    positions: &[i64],
    outer: usize,
    inner: usize,
    top_k: usize,
    comparator: &C,
) -> Vec<usize> {
    let mut entries: Vec<Entry> = (0..input.dim_size)
        .map(|slot| {
            let flat = flat_index(outer, slot, inner, input.dim_size, input.inner_size);
            let mut tuple = TupleBuf::new();
            input.load_tuple(flat, &mut tuple);
            Entry {
                tuple,
                slot,
                position: positions[flat],
            }
        })
        .collect();

    let order = |a: &Entry, b: &Entry| entry_order(comparator, a, b);
    if top_k < entries.len() {
        entries.select_nth_unstable_by(top_k - 1, order);
        entries.truncate(top_k);
    }
    entries.sort_by(order);
    entries.into_iter().map(|e| e.slot).collect()
}

/// Candidate slot chosen for every output slot, laid out as `[outer, top_k, inner]`.
///
/// `input` describes the candidate tensors (`dim_size` = number of candidates)
/// and `positions` their original positions in the same layout.
pub(crate) fn aggregate_kernel<C: Comparator + ?Sized>(
    client: &CpuClient,
    input: &ReduceInput<'_>,
    positions: &[i64],
    top_k: usize,
    comparator: &C,
) -> Vec<i64> {
    let num_coords = input.outer_size * input.inner_size;
    let select = |coord: usize| {
        let (outer, inner) = (coord / input.inner_size, coord % input.inner_size);
        select_coordinate(input, positions, outer, inner, top_k, comparator)
    };

    #[cfg(feature = "rayon")]
    let per_coord: Vec<Vec<usize>> = client.install_parallelism(|| {
        (0..num_coords)
            .into_par_iter()
            .with_min_len(client.rayon_min_len())
            .map(select)
            .collect()
    });

    #[cfg(not(feature = "rayon"))]
    let per_coord: Vec<Vec<usize>> = {
        let _ = client;
        (0..num_coords).map(select).collect()
    };

    let mut slots = vec![0i64; num_coords * top_k];
    for (coord, chosen) in per_coord.iter().enumerate() {
        let (outer, inner) = (coord / input.inner_size, coord % input.inner_size);
        for (rank, &slot) in chosen.iter().enumerate() {
            slots[flat_index(outer, rank, inner, top_k, input.inner_size)] = slot as i64;
        }
    }
    slots
}
