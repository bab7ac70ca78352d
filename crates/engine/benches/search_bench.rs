//! Benchmarks for cutting plan calculation.
//!
//! Measures single packing attempts per backend and the full pipeline at
//! various job sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cutplan_core::{Part, PartList, PartSpec, PlanConfig};
use cutplan_engine::search::run_attempt;
use cutplan_engine::{expand_pieces, Backend, PlanEngine, SortOrder};

fn job(n: usize) -> Vec<Part> {
    let mut list = PartList::new();
    for i in 0..n {
        let w = 120.0 + (i as f64 * 37.0) % 480.0;
        let h = 80.0 + (i as f64 * 53.0) % 320.0;
        let spec = PartSpec::new(format!("R{i}"), w, h)
            .with_material("MDF", if i % 3 == 0 { 12.0 } else { 18.0 })
            .with_quantity(1 + i % 3);
        list.add(spec).unwrap();
    }
    list.as_slice().to_vec()
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("attempt");
    let parts = job(40);
    let pieces = expand_pieces(&parts);
    let config = PlanConfig::default();

    for backend in Backend::ALL {
        group.bench_with_input(BenchmarkId::new("area_desc", backend.label()), &pieces, |b, p| {
            b.iter(|| run_attempt(black_box(p), SortOrder::AreaDesc, backend, &config))
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");
    group.sample_size(10);

    for &n in &[10, 40, 100] {
        let parts = job(n);
        let engine = PlanEngine::default_config();
        group.bench_with_input(BenchmarkId::new("parts", n), &parts, |b, p| {
            b.iter(|| black_box(engine.calculate(black_box(p), None)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_backends, bench_pipeline);
criterion_main!(benches);
