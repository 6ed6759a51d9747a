//! Property-based tests for the test topology index.
//!
//! Uses proptest over random call graphs and test suites to verify:
//!   - the test ↔ function mapping is mirrored in both directions
//!   - consecutive rebuilds produce the same index
//!   - each test reaches exactly its BFS-reachable set
//!   - adding tests never uncovers a function
//!   - change-based selection covers every coverable changed function

use std::collections::{BTreeSet, VecDeque};

use proptest::prelude::*;

use topograph_analysis::call_graph::{CallGraph, CallSiteRef, FunctionNode};
use topograph_analysis::extraction::{TestCase, TestExtraction, TestFramework};
use topograph_analysis::graph::test_topology::TestTopologyAnalyzer;
use topograph_core::types::FunctionId;

const FILES: usize = 3;

/// Function i calls each index in `edges[i]` (one call site per index).
#[derive(Debug, Clone)]
struct Suite {
    edges: Vec<Vec<usize>>,
    /// Per test: direct call indices; indices ≥ function count are unresolvable.
    tests: Vec<Vec<usize>>,
}

fn suite_strategy() -> impl Strategy<Value = Suite> {
    (1usize..16).prop_flat_map(|n| {
        let edges = prop::collection::vec(prop::collection::vec(0..n, 0..4), n);
        let tests = prop::collection::vec(prop::collection::vec(0..n + 2, 0..4), 1..6);
        (edges, tests).prop_map(|(edges, tests)| Suite { edges, tests })
    })
}

fn fn_id(i: usize) -> String {
    format!("f{i}")
}

fn fn_file(i: usize) -> String {
    format!("src/m{}.ts", i % FILES)
}

fn build_graph(suite: &Suite) -> CallGraph {
    let nodes = suite.edges.iter().enumerate().map(|(i, callees)| FunctionNode {
        id: FunctionId::new(fn_id(i)),
        name: fn_id(i),
        qualified_name: fn_id(i),
        file: fn_file(i),
        start_line: i as u32,
        calls: callees.iter().map(|&c| CallSiteRef::to([fn_id(c)])).collect(),
        ..Default::default()
    });
    CallGraph::from_functions(nodes, Vec::<FunctionId>::new())
}

fn build_extraction(tests: &[Vec<usize>], offset: usize) -> TestExtraction {
    let file = format!("tests/suite{offset}.test.ts");
    let mut ex = TestExtraction::new(file.clone(), TestFramework::Jest);
    ex.test_cases = tests
        .iter()
        .enumerate()
        .map(|(i, calls)| TestCase {
            id: TestCase::make_id(&file, &format!("t{i}"), i as u32),
            name: format!("t{i}"),
            line: i as u32,
            direct_calls: calls.iter().map(|&c| fn_id(c)).collect(),
            ..Default::default()
        })
        .collect();
    ex
}

fn analyzer_for(suite: &Suite) -> TestTopologyAnalyzer {
    let mut analyzer = TestTopologyAnalyzer::new();
    analyzer.ingest(build_extraction(&suite.tests, 0));
    analyzer.set_call_graph(build_graph(suite));
    analyzer.build_mappings();
    analyzer
}

/// Independent reachability over the adjacency lists, including the starts.
fn expected_reach(suite: &Suite, starts: &[usize]) -> BTreeSet<String> {
    let n = suite.edges.len();
    let mut seen = vec![false; n];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &s in starts.iter().filter(|&&s| s < n) {
        if !seen[s] {
            seen[s] = true;
            queue.push_back(s);
        }
    }
    while let Some(cur) = queue.pop_front() {
        for &next in &suite.edges[cur] {
            if !seen[next] {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    (0..n).filter(|&i| seen[i]).map(fn_id).collect()
}

fn covered_set(analyzer: &TestTopologyAnalyzer) -> BTreeSet<String> {
    analyzer
        .mapping()
        .function_to_tests
        .iter()
        .filter(|(_, tests)| !tests.is_empty())
        .map(|(f, _)| f.to_string())
        .collect()
}

fn snapshot(analyzer: &TestTopologyAnalyzer) -> Vec<(String, BTreeSet<String>)> {
    let mut rows: Vec<(String, BTreeSet<String>)> = analyzer
        .mapping()
        .test_to_functions
        .iter()
        .map(|(t, fs)| (t.to_string(), fs.iter().map(|f| f.to_string()).collect()))
        .collect();
    rows.sort();
    rows
}

// ═══════════════════════════════════════════════════════════════════
// Mapping invariants
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_mapping_is_mirrored(suite in suite_strategy()) {
        let analyzer = analyzer_for(&suite);
        let mapping = analyzer.mapping();
        for (test, functions) in &mapping.test_to_functions {
            for f in functions {
                prop_assert!(mapping.function_to_tests.get(f).is_some_and(|ts| ts.contains(test)));
            }
        }
        for (f, tests) in &mapping.function_to_tests {
            for test in tests {
                prop_assert!(mapping.test_to_functions.get(test).is_some_and(|fs| fs.contains(f)));
            }
        }
    }

    #[test]
    fn prop_rebuild_is_idempotent(suite in suite_strategy()) {
        let mut analyzer = analyzer_for(&suite);
        let before = snapshot(&analyzer);
        let first = analyzer.build_mappings();
        let second = analyzer.build_mappings();
        prop_assert_eq!(snapshot(&analyzer), before);
        prop_assert_eq!(first.direct_edges, second.direct_edges);
        prop_assert_eq!(first.transitive_edges, second.transitive_edges);
    }

    #[test]
    fn prop_closure_is_exactly_reachable_set(suite in suite_strategy()) {
        let analyzer = analyzer_for(&suite);
        let file = "tests/suite0.test.ts";
        for (i, calls) in suite.tests.iter().enumerate() {
            let id = TestCase::make_id(file, &format!("t{i}"), i as u32);
            let actual: BTreeSet<String> = analyzer
                .functions_for_test(id.as_str())
                .map(|fs| fs.iter().map(|f| f.to_string()).collect())
                .unwrap_or_default();
            prop_assert_eq!(actual, expected_reach(&suite, calls));

            let direct: BTreeSet<String> = calls
                .iter()
                .filter(|&&c| c < suite.edges.len())
                .map(|&c| fn_id(c))
                .collect();
            let transitive = &analyzer.test_case(id.as_str()).unwrap().transitive_calls;
            for f in transitive {
                prop_assert!(!direct.contains(f.as_str()));
            }
        }
    }

    #[test]
    fn prop_adding_tests_never_uncovers(suite in suite_strategy(), extra in prop::collection::vec(0usize..16, 0..4)) {
        let mut analyzer = analyzer_for(&suite);
        let before = covered_set(&analyzer);

        analyzer.ingest(build_extraction(&[extra], 1));
        analyzer.build_mappings();
        let after = covered_set(&analyzer);

        prop_assert!(before.is_subset(&after));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Test impact analysis
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_minimum_set_is_sound(suite in suite_strategy(), changed in prop::collection::btree_set(0..FILES, 0..=FILES)) {
        let analyzer = analyzer_for(&suite);
        let changed_files: Vec<String> = changed.iter().map(|&i| format!("src/m{i}.ts")).collect();
        let set = analyzer.get_minimum_test_set(&changed_files);

        let selected: BTreeSet<String> = set.tests.iter().map(|t| t.test_id.to_string()).collect();
        let changed_fns: Vec<usize> = (0..suite.edges.len())
            .filter(|&i| changed.contains(&(i % FILES)))
            .collect();

        let mut coverable = 0usize;
        for &i in &changed_fns {
            if let Some(tests) = analyzer.tests_for_function(&fn_id(i)) {
                coverable += 1;
                prop_assert!(tests.iter().any(|t| selected.contains(t.as_str())));
            }
        }

        prop_assert_eq!(set.changed_functions, changed_fns.len());
        let expected = if changed_fns.is_empty() {
            100
        } else {
            (coverable as f64 / changed_fns.len() as f64 * 100.0).round() as u32
        };
        prop_assert_eq!(set.changed_code_coverage, expected);
        prop_assert!(set.selected_tests <= set.total_tests);
    }

    #[test]
    fn prop_covering_set_covers_everything_covered(suite in suite_strategy()) {
        let analyzer = analyzer_for(&suite);
        let set = analyzer.get_minimum_covering_set();

        let mut union: BTreeSet<String> = BTreeSet::new();
        for test in &set.tests {
            if let Some(fs) = analyzer.functions_for_test(test.as_str()) {
                union.extend(fs.iter().map(|f| f.to_string()));
            }
        }
        prop_assert_eq!(union, covered_set(&analyzer));
        prop_assert!(set.tests.len() <= suite.tests.len());
    }
}
