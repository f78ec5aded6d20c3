//! Benchmarks for the step generators
//!
//! Measures trace generation on grid graphs of increasing size:
//! - each algorithm from corner to corner
//! - adjacency construction on its own

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stepgraph_core::{Adjacency, Algorithm, Edge, Graph, Node};

/// Square grid with right and down edges, weights varying by position.
fn grid(side: usize) -> Graph {
    let id = |row: usize, col: usize| format!("{row}-{col}");
    let mut graph = Graph::new();
    for row in 0..side {
        for col in 0..side {
            graph.add_node(Node::new(id(row, col), id(row, col)).at(col as f64 * 10.0, row as f64 * 10.0));
        }
    }
    for row in 0..side {
        for col in 0..side {
            let weight = 10 + ((row * 7 + col * 3) % 5) as u32;
            if col + 1 < side {
                let edge = format!("r{row}-{col}");
                graph.add_edge(Edge::new(edge, id(row, col), id(row, col + 1), weight));
            }
            if row + 1 < side {
                let edge = format!("d{row}-{col}");
                graph.add_edge(Edge::new(edge, id(row, col), id(row + 1, col), weight));
            }
        }
    }
    graph
}

/// Benchmark each generator corner to corner
fn bench_generators(c: &mut Criterion) {
    for algorithm in Algorithm::ALL {
        let mut group = c.benchmark_group(format!("generate/{}", algorithm.name()));

        for &side in &[5usize, 10, 20] {
            let graph = grid(side);
            let goal = format!("{}-{}", side - 1, side - 1);
            group.throughput(Throughput::Elements(graph.edge_count() as u64));
            group.bench_with_input(BenchmarkId::from_parameter(side), &graph, |b, g| {
                b.iter(|| algorithm.generate(black_box(g), "0-0", Some(goal.as_str())))
            });
        }
        group.finish();
    }
}

/// Benchmark adjacency construction
fn bench_adjacency(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjacency");

    for &side in &[10usize, 50] {
        let graph = grid(side);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &graph, |b, g| {
            b.iter(|| Adjacency::build(black_box(g)).len())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generators, bench_adjacency);

criterion_main!(benches);
