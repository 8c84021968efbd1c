use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use helicoil::analysis::analyze;
use helicoil::coil::CoilConfig;
use helicoil::materials::MaterialRegistry;
use helicoil::proximity::MedhurstTable;
use helicoil::solver::{PhasingCoilSolver, PhasingCoilSpec};

fn reference_coil() -> CoilConfig {
    let registry = MaterialRegistry::standard();
    let copper = *registry.get("Cu, annealed").expect("standard material");
    CoilConfig::new(6.0, 3.0e-3, 1.0e-3, 8.0e-3, 10.0e6, copper)
}

fn bench_analyze(c: &mut Criterion) {
    let table = MedhurstTable::new();
    let coil = reference_coil();

    c.bench_function("analyze_reference_coil", |b| {
        b.iter(|| analyze(&coil, &table).expect("analysis"))
    });
}

fn bench_phasing_search(c: &mut Criterion) {
    let registry = MaterialRegistry::standard();
    let mut group = c.benchmark_group("phasing_search");
    group.sample_size(10);

    for workers in [1usize, 4] {
        let spec = PhasingCoilSpec {
            phase_shift_rad: core::f64::consts::PI,
            phase_shift_tolerance_pct: 0.5,
            frequency: 27.0e6,
            wire_core_diameter_mm: 0.4,
            wire_insulated_diameter_mm: 2.7,
            turns: (95, 100),
            former_diameters_mm: vec![32.0],
            length_range_mm: (260.0, 310.0, 1.0),
            material: "Cu, annealed".to_owned(),
            max_turn_spacing_mm: None,
            workers: Some(workers),
        };
        let solver = PhasingCoilSolver::new(spec, &registry).expect("valid spec");
        group.bench_function(BenchmarkId::new("workers", workers), |b| {
            b.iter(|| solver.solve())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze, bench_phasing_search);
criterion_main!(benches);
