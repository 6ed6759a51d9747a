use criterion::{criterion_group, criterion_main, Criterion};

use topograph_analysis::call_graph::{CallGraph, CallSiteRef, FunctionNode};
use topograph_analysis::extraction::{TestCase, TestExtraction, TestFramework};
use topograph_analysis::graph::test_topology::{TestTopologyAnalyzer, UncoveredOptions};
use topograph_core::types::FunctionId;

/// 2K functions in 100 files, each calling up to 3 forward neighbours.
fn build_graph() -> CallGraph {
    let n = 2_000;
    let nodes = (0..n).map(|i| FunctionNode {
        id: FunctionId::new(format!("fn{i}")),
        name: format!("fn{i}"),
        qualified_name: format!("Mod{}.fn{i}", i % 100),
        file: format!("src/mod{}.ts", i % 100),
        start_line: i as u32,
        calls: (1..=3)
            .map(|j| i + j * 7)
            .filter(|&t| t < n)
            .map(|t| CallSiteRef::to([format!("fn{t}")]))
            .collect(),
        ..Default::default()
    });
    CallGraph::from_functions(nodes, Vec::<FunctionId>::new())
}

/// 50 test files with 10 tests each, every test calling two functions.
fn build_extractions() -> Vec<TestExtraction> {
    (0..50)
        .map(|f| {
            let file = format!("tests/mod{f}.test.ts");
            let mut ex = TestExtraction::new(file.clone(), TestFramework::Jest);
            ex.test_cases = (0..10u32)
                .map(|t| {
                    let target = (f * 40 + t as usize * 3) % 2_000;
                    TestCase {
                        id: TestCase::make_id(&file, &format!("t{t}"), t),
                        name: format!("t{t}"),
                        line: t,
                        direct_calls: vec![format!("fn{target}"), format!("fn{}", target + 1)],
                        ..Default::default()
                    }
                })
                .collect();
            ex
        })
        .collect()
}

fn loaded_analyzer() -> TestTopologyAnalyzer {
    let mut analyzer = TestTopologyAnalyzer::new();
    for ex in build_extractions() {
        analyzer.ingest(ex);
    }
    analyzer.set_call_graph(build_graph());
    analyzer
}

fn bench_build_mappings(c: &mut Criterion) {
    let mut analyzer = loaded_analyzer();
    c.bench_function("build_mappings_500_tests_2k_functions", |b| {
        b.iter(|| analyzer.build_mappings());
    });
}

fn bench_queries(c: &mut Criterion) {
    let mut analyzer = loaded_analyzer();
    analyzer.build_mappings();
    let changed: Vec<String> = (0..10).map(|i| format!("src/mod{i}.ts")).collect();

    c.bench_function("minimum_test_set_10_files", |b| {
        b.iter(|| analyzer.get_minimum_test_set(&changed));
    });
    c.bench_function("uncovered_functions", |b| {
        b.iter(|| analyzer.get_uncovered_functions(UncoveredOptions::default()));
    });
}

criterion_group!(benches, bench_build_mappings, bench_queries);
criterion_main!(benches);
