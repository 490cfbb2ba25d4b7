//! Benchmarks for Qarch state-vector gate application
//!
//! Run with: cargo bench -p qarch-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;

use qarch_builder::{EditorGraph, EditorNode};
use qarch_ir::{CircuitModel, Gate, QubitId};
use qarch_sim::{RunOptions, SimConfig, SimulationService, Statevector};

/// Benchmark one gate per arity across register sizes
fn bench_gate_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_application");
    let config = SimConfig::default();

    for num_qubits in &[4u32, 10, 16] {
        let n = *num_qubits;
        let cases: [(&str, Gate, Vec<QubitId>); 3] = [
            ("h", Gate::H, vec![QubitId(n / 2)]),
            ("cx", Gate::CX, vec![QubitId(0), QubitId(n - 1)]),
            ("ccx", Gate::CCX, vec![QubitId(0), QubitId(1), QubitId(n - 1)]),
        ];
        for (name, gate, targets) in cases {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                let mut state = Statevector::new(n, &config).unwrap();
                b.iter(|| {
                    state.apply(black_box(&gate), black_box(&targets)).unwrap();
                });
            });
        }
    }

    group.bench_function("rx_12", |b| {
        let mut state = Statevector::new(12, &config).unwrap();
        b.iter(|| {
            state.apply(&Gate::Rx(black_box(PI / 3.0)), &[QubitId(5)]).unwrap();
        });
    });

    group.finish();
}

/// Benchmark full GHZ simulation
fn bench_ghz_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_simulation");
    let service = SimulationService::default();

    for num_qubits in &[5u32, 10, 15] {
        let circuit = CircuitModel::ghz(*num_qubits).unwrap();
        group.bench_with_input(
            BenchmarkId::new("simulate", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| {
                    service
                        .simulate(black_box(circuit), &RunOptions::default())
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the full editor-graph pipeline
fn bench_service_run(c: &mut Criterion) {
    let mut graph = EditorGraph::new();
    for q in 0..8u32 {
        graph = graph.node(EditorNode::new(format!("q{q}"), "input", 0.0, f64::from(q) * 100.0));
    }
    for q in 0..8u32 {
        let id = format!("h{q}");
        graph = graph
            .node(EditorNode::new(id.clone(), "H", 100.0, f64::from(q) * 100.0))
            .edge(format!("q{q}"), id);
    }
    let service = SimulationService::default();
    let options = RunOptions::default().with_shots(1000);

    c.bench_function("service_run_8q", |b| {
        b.iter(|| service.run(black_box(&graph), &options).unwrap());
    });
}

criterion_group!(
    benches,
    bench_gate_application,
    bench_ghz_simulation,
    bench_service_run
);
criterion_main!(benches);
