//! Per-file coverage report over the bipartite mapping.

use std::collections::BTreeMap;

use topograph_core::types::{FunctionId, TestId};

use crate::call_graph::CallGraph;
use crate::extraction::TestExtraction;

use super::resolver::Resolution;
use super::types::{
    percent, CoverageMapping, FunctionCoverageInfo, ReachType, TestCoverage, TestCoverageInfo,
};

/// Build the coverage report for `file`.
///
/// A file the call graph does not know yields an empty report with 0%.
pub fn compute_file_coverage(
    graph: &CallGraph,
    mapping: &CoverageMapping,
    extractions: &BTreeMap<String, TestExtraction>,
    file: &str,
) -> TestCoverage {
    let mut functions = Vec::new();
    // test → functions of this file it covers, ordered by test id.
    let mut per_test: BTreeMap<TestId, Vec<FunctionId>> = BTreeMap::new();

    for &idx in graph.get_file_nodes(file) {
        let node = graph.node(idx);
        let mut covered_by: Vec<TestId> = mapping
            .tests_for(node.id.as_str())
            .map(|tests| tests.iter().cloned().collect())
            .unwrap_or_default();
        covered_by.sort();

        let is_covered = !covered_by.is_empty();
        let is_mocked_only = is_covered
            && covered_by.iter().all(|test| {
                mapping
                    .tests
                    .get(test)
                    .and_then(|t| extractions.get(&t.file))
                    .is_some_and(|ex| ex.mocks_function(&node.name, &node.qualified_name))
            });

        for test in &covered_by {
            per_test.entry(test.clone()).or_default().push(node.id.clone());
        }

        functions.push(FunctionCoverageInfo {
            function_id: node.id.clone(),
            name: node.name.clone(),
            qualified_name: node.qualified_name.clone(),
            line: node.start_line,
            covered_by,
            is_covered,
            is_mocked_only,
        });
    }

    let tests = per_test
        .into_iter()
        .map(|(test_id, covered_functions)| test_info(mapping, test_id, covered_functions))
        .collect();

    let total_functions = functions.len();
    let covered_functions = functions.iter().filter(|f| f.is_covered).count();

    TestCoverage {
        file: file.to_string(),
        tests,
        functions,
        covered_functions,
        total_functions,
        coverage_percent: percent(covered_functions, total_functions, 0),
    }
}

fn test_info(
    mapping: &CoverageMapping,
    test_id: TestId,
    covered_functions: Vec<FunctionId>,
) -> TestCoverageInfo {
    let direct: Vec<Resolution> = covered_functions
        .iter()
        .filter_map(|f| mapping.direct_resolution(test_id.as_str(), f.as_str()))
        .collect();

    let reach_type = if direct.is_empty() {
        ReachType::Transitive
    } else {
        ReachType::Direct
    };
    let confidence = if !direct.is_empty() && direct.iter().all(Resolution::is_ambiguous) {
        Resolution::Ambiguous.confidence()
    } else {
        reach_type.confidence()
    };

    let (test_file, test_name) = mapping
        .tests
        .get(test_id.as_str())
        .map(|t| (t.file.clone(), t.name.clone()))
        .unwrap_or_default();

    TestCoverageInfo {
        test_name,
        test_file,
        reach_type,
        depth: reach_type.depth(),
        confidence,
        covered_functions,
        test_id,
    }
}
