//! Common test utilities
#![allow(dead_code)]

use numr_approx_topk::runtime::cpu::{CpuClient, ParallelismConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create a CPU client for testing
pub fn create_cpu_client() -> CpuClient {
    CpuClient::new()
}

/// Create a CPU client on a dedicated pool that splits work as finely as possible
pub fn create_cpu_client_with_threads(num_threads: usize) -> CpuClient {
    CpuClient::with_parallelism(
        ParallelismConfig::default()
            .with_min_len(1)
            .with_num_threads(num_threads),
    )
    .unwrap()
}

/// Seeded uniform f32 data in `[0, 1)`
pub fn rand_vec_f32(n: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random::<f32>()).collect()
}

/// Exact top-k positions of `data`, largest first, ties by smaller position
pub fn brute_force_topk<T: PartialOrd + Copy>(data: &[T], k: usize) -> Vec<i64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| {
        data[b]
            .partial_cmp(&data[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order.into_iter().take(k).map(|i| i as i64).collect()
}

/// Fraction of `expected` positions found in `got`
pub fn recall_of(got: &[i64], expected: &[i64]) -> f64 {
    let hits = expected.iter().filter(|p| got.contains(p)).count();
    hits as f64 / expected.len() as f64
}
