//! Property-based tests for approximate top-k.
//!
//! Key invariants:
//! - At full recall the result equals brute-force top-k, ties by smaller position
//! - Each candidate is the first best element of its own window
//! - The solved output size lies in `[top_k, input_size]` and grows with the recall target
//! - Aggregated output is sorted and drawn from distinct positions
//! - Results do not depend on the number of threads

mod common;

use common::{brute_force_topk, create_cpu_client, create_cpu_client_with_threads};
use numr_approx_topk::algorithm::recall::expected_recall;
use numr_approx_topk::approx_top_k_reduction_output_size;
use numr_approx_topk::prelude::*;
use proptest::prelude::*;

fn small_ints(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-20i32..20, 1..max_len)
}

proptest! {
    /// Full recall with aggregation degenerates to exact top-k.
    #[test]
    fn full_recall_matches_brute_force(data in small_ints(300), k_seed in any::<usize>()) {
        let k = 1 + k_seed % data.len();
        let client = create_cpu_client();
        let x = Tensor::from_slice(&data, &[data.len()]);

        let out = client
            .approx_top_k_with_positions(
                &[x],
                &[Scalar::I32(i32::MIN)],
                k,
                0,
                &Greater::default(),
                ApproxTopKOptions::default().with_recall_target(1.0),
            )
            .unwrap();

        let expected = brute_force_topk(&data, k);
        prop_assert_eq!(out.positions.to_vec::<i64>(), expected.clone());
        let values: Vec<i32> = expected.iter().map(|&p| data[p as usize]).collect();
        prop_assert_eq!(out.values[0].to_vec::<i32>(), values);
    }

    /// Every window contributes exactly its first best element.
    #[test]
    fn window_winners_cover_each_window(data in small_ints(200), window in 1usize..50) {
        let client = create_cpu_client();
        let x = Tensor::from_slice(&data, &[data.len()]);

        let candidates = client
            .reduce_windows(&[x], &[Scalar::I32(i32::MIN)], 0, window, &Greater::default())
            .unwrap();

        prop_assert_eq!(candidates.num_candidates(), data.len().div_ceil(window));
        let positions = candidates.positions().to_vec::<i64>();
        for (i, chunk) in data.chunks(window).enumerate() {
            let best = *chunk.iter().max().unwrap();
            let first = chunk.iter().position(|&v| v == best).unwrap();
            prop_assert_eq!(positions[i], (i * window + first) as i64);
        }
    }

    /// The solved output size is bounded and meets reachable recall targets.
    #[test]
    fn solver_output_is_bounded(
        n in 1usize..200_000,
        k_seed in any::<usize>(),
        recall in 0.01f32..=1.0f32,
    ) {
        let k = 1 + k_seed % n.min(2_000);
        let (size, log2) = approx_top_k_reduction_output_size(n, 1, k, recall, false).unwrap();

        prop_assert!(size >= k && size <= n);
        if k == 1 {
            prop_assert_eq!((size, log2), (1, -1));
        } else {
            prop_assert!(log2 >= 0);
            prop_assert_eq!(size, n.div_ceil(1usize << log2));
            if expected_recall(n, k) >= recall as f64 {
                prop_assert!(expected_recall(size, k) >= recall as f64);
            }
        }
    }

    /// A stricter recall target never yields fewer candidates.
    #[test]
    fn solver_is_monotone_in_recall(
        n in 2usize..200_000,
        k_seed in any::<usize>(),
        a in 0.01f32..=1.0f32,
        b in 0.01f32..=1.0f32,
    ) {
        let k = 1 + k_seed % n.min(2_000);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (size_lo, _) = approx_top_k_reduction_output_size(n, 1, k, lo, false).unwrap();
        let (size_hi, _) = approx_top_k_reduction_output_size(n, 1, k, hi, false).unwrap();
        prop_assert!(size_lo <= size_hi);
    }

    /// Aggregated rows are sorted, distinct, and consistent with the input.
    #[test]
    fn aggregated_rows_are_sorted(
        rows in 1usize..4,
        n in 16usize..600,
        k_seed in any::<usize>(),
        seed in any::<u64>(),
    ) {
        let k = 1 + k_seed % 16;
        let data = common::rand_vec_f32(rows * n, seed);
        let client = create_cpu_client();
        let x = Tensor::from_slice(&data, &[rows, n]);

        let out = client
            .approx_top_k_with_positions(
                &[x],
                &[Scalar::F32(f32::NEG_INFINITY)],
                k,
                -1,
                &Greater::default(),
                ApproxTopKOptions::default(),
            )
            .unwrap();

        prop_assert_eq!(out.values[0].shape(), &[rows, k]);
        let values = out.values[0].to_vec::<f32>();
        let positions = out.positions.to_vec::<i64>();
        for r in 0..rows {
            let row_vals = &values[r * k..(r + 1) * k];
            let row_pos = &positions[r * k..(r + 1) * k];
            prop_assert!(row_vals.windows(2).all(|w| w[0] >= w[1]));
            let mut distinct = row_pos.to_vec();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(distinct.len(), k);
            for (v, &p) in row_vals.iter().zip(row_pos) {
                prop_assert_eq!(*v, data[r * n + p as usize]);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Thread count changes scheduling only.
    #[test]
    fn deterministic_across_thread_counts(
        data in prop::collection::vec(-5i32..5, 64..2_000),
        k_seed in any::<usize>(),
        aggregate in any::<bool>(),
    ) {
        let k = 1 + k_seed % data.len().min(32);
        let x = Tensor::from_slice(&data, &[data.len()]);
        let options = ApproxTopKOptions::default()
            .with_recall_target(0.8)
            .with_aggregate_to_topk(aggregate);
        let run = |client: &CpuClient| {
            let out = client
                .approx_top_k_with_positions(
                    &[x.clone()],
                    &[Scalar::I32(i32::MIN)],
                    k,
                    0,
                    &Greater::default(),
                    options,
                )
                .unwrap();
            (out.positions.to_vec::<i64>(), out.values[0].as_bytes().to_vec())
        };

        prop_assert_eq!(
            run(&create_cpu_client_with_threads(1)),
            run(&create_cpu_client_with_threads(3))
        );
    }
}
