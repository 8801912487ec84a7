#![allow(dead_code)]

use fluxbench::{Bencher, flux};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use numr_approx_topk::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rand_tensor(shape: &[usize]) -> Tensor {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let n: usize = shape.iter().product();
    let data: Vec<f32> = (0..n).map(|_| rng.random::<f32>()).collect();
    Tensor::from_slice(&data, shape)
}

fn index_payload(rows: usize, n: usize) -> Tensor {
    let data: Vec<i32> = (0..rows).flat_map(|_| 0..n as i32).collect();
    Tensor::from_slice(&data, &[rows, n])
}

fn init() -> [Scalar; 1] {
    [Scalar::F32(f32::NEG_INFINITY)]
}

fn run(client: &CpuClient, x: &Tensor, k: usize, options: ApproxTopKOptions) -> Vec<Tensor> {
    client
        .approx_top_k(&[x.clone()], &init(), k, -1, &Greater::default(), options)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Single row, recall targets
// ---------------------------------------------------------------------------

#[flux::bench(group = "approx_topk_1d_f32")]
fn recall_090_100k(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[100_000]);
    b.iter(|| black_box(run(&client, &x, 100, ApproxTopKOptions::default())));
}

#[flux::bench(group = "approx_topk_1d_f32")]
fn recall_099_100k(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[100_000]);
    let options = ApproxTopKOptions::default().with_recall_target(0.99);
    b.iter(|| black_box(run(&client, &x, 100, options)));
}

#[flux::bench(group = "approx_topk_1d_f32")]
fn exact_100k(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[100_000]);
    let options = ApproxTopKOptions::default().with_recall_target(1.0);
    b.iter(|| black_box(run(&client, &x, 100, options)));
}

#[flux::bench(group = "approx_topk_1d_f32")]
fn recall_090_1m(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[1_000_000]);
    b.iter(|| black_box(run(&client, &x, 100, ApproxTopKOptions::default())));
}

// ---------------------------------------------------------------------------
// Batched rows
// ---------------------------------------------------------------------------

#[flux::bench(group = "approx_topk_batched_f32")]
fn batched_64x32k(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[64, 32_768]);
    b.iter(|| black_box(run(&client, &x, 64, ApproxTopKOptions::default())));
}

#[flux::bench(group = "approx_topk_batched_f32")]
fn batched_64x32k_no_aggregate(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[64, 32_768]);
    let options = ApproxTopKOptions::default().with_aggregate_to_topk(false);
    b.iter(|| black_box(run(&client, &x, 64, options)));
}

#[flux::bench(group = "approx_topk_batched_f32")]
fn batched_64x32k_with_indices(b: &mut Bencher) {
    let client = CpuClient::new();
    let x = rand_tensor(&[64, 32_768]);
    let idx = index_payload(64, 32_768);
    let init = [Scalar::F32(f32::NEG_INFINITY), Scalar::I32(-1)];
    b.iter(|| {
        black_box(
            client
                .approx_top_k(
                    &[x.clone(), idx.clone()],
                    &init,
                    64,
                    -1,
                    &Greater::new(0),
                    ApproxTopKOptions::default(),
                )
                .unwrap(),
        )
    });
}

// ---------------------------------------------------------------------------
// Parallelism
// ---------------------------------------------------------------------------

#[flux::bench(group = "approx_topk_threads")]
fn single_thread_64x32k(b: &mut Bencher) {
    let client =
        CpuClient::with_parallelism(ParallelismConfig::default().with_num_threads(1)).unwrap();
    let x = rand_tensor(&[64, 32_768]);
    b.iter(|| black_box(run(&client, &x, 64, ApproxTopKOptions::default())));
}

#[flux::bench(group = "approx_topk_threads")]
fn fine_grained_64x32k(b: &mut Bencher) {
    let client = CpuClient::with_parallelism(ParallelismConfig::default().with_min_len(1)).unwrap();
    let x = rand_tensor(&[64, 32_768]);
    b.iter(|| black_box(run(&client, &x, 64, ApproxTopKOptions::default())));
}

fn main() {
    fluxbench_cli::run().unwrap();
}
