//! Benchmarks for the copy-based shape transforms.
//!
//! Run with:
//! ```bash
//! cargo bench --bench transforms
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndtensor::Tensor;

fn bench_permute(c: &mut Criterion) {
    let mut group = c.benchmark_group("permute");

    let cases = vec![
        ("2d_transpose", vec![512, 512], vec![1, 0]),
        ("3d_rotate", vec![64, 64, 64], vec![2, 0, 1]),
        ("4d_swap_inner", vec![16, 32, 32, 8], vec![0, 1, 3, 2]),
    ];

    for (name, dims, order) in cases {
        let len: usize = dims.iter().product();
        let tensor = Tensor::from_vec((0..len as i64).collect(), &dims).unwrap();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &order, |b, order| {
            b.iter(|| black_box(tensor.permute(black_box(order)).unwrap()));
        });
    }

    group.finish();
}

fn bench_densify(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_contiguous");

    let tensor = Tensor::from_vec((0..1 << 20).collect::<Vec<i64>>(), &[1024, 1024]).unwrap();
    let window = tensor.slice_ranges(&[128..896, 128..896]).unwrap();
    group.throughput(Throughput::Elements(window.flat_len() as u64));
    group.bench_function("strided_window", |b| {
        b.iter(|| black_box(window.to_contiguous().unwrap()));
    });

    group.finish();
}

fn bench_broadcast_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_add");

    let grid = Tensor::<f64>::zeros(&[256, 1024]);
    let row = Tensor::from_vec((0..1024).map(f64::from).collect::<Vec<_>>(), &[1024]).unwrap();
    group.throughput(Throughput::Elements(grid.flat_len() as u64));
    group.bench_function("row_against_grid", |b| {
        b.iter(|| black_box(grid.add(black_box(&row)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_permute, bench_densify, bench_broadcast_add);
criterion_main!(benches);
