//! Project-wide test topology rollup.

use std::collections::BTreeMap;

use crate::call_graph::CallGraph;
use crate::extraction::{TestExtraction, TestFramework};

use super::test_files::TestFileClassifier;
use super::types::{percent, CoverageMapping, TestTopologySummary};

/// Summarize the stored extractions and, when a call graph is present,
/// source-file and function coverage. Test files are excluded from the
/// coverage denominators.
pub fn compute_summary(
    extractions: &BTreeMap<String, TestExtraction>,
    graph: Option<&CallGraph>,
    mapping: &CoverageMapping,
    classifier: &TestFileClassifier,
) -> TestTopologySummary {
    let mut by_framework: BTreeMap<String, usize> = TestFramework::all()
        .iter()
        .map(|f| (f.name().to_string(), 0))
        .collect();

    let mut test_cases = 0usize;
    let mut skipped_tests = 0usize;
    let mut score_sum = 0u64;
    let mut ratio_sum = 0.0f64;

    for extraction in extractions.values() {
        *by_framework
            .entry(extraction.framework.name().to_string())
            .or_default() += extraction.test_cases.len();
        for test in &extraction.test_cases {
            test_cases += 1;
            if test.is_skipped {
                skipped_tests += 1;
            }
            score_sum += u64::from(test.quality.score);
            ratio_sum += test.quality.mock_ratio;
        }
    }

    let (avg_quality_score, avg_mock_ratio) = if test_cases > 0 {
        (
            score_sum as f64 / test_cases as f64,
            ratio_sum / test_cases as f64,
        )
    } else {
        (0.0, 0.0)
    };

    let mut summary = TestTopologySummary {
        test_files: extractions.len(),
        test_cases,
        skipped_tests,
        by_framework,
        avg_quality_score,
        avg_mock_ratio,
        covered_files: 0,
        total_files: 0,
        file_coverage_percent: 0,
        covered_functions: 0,
        total_functions: 0,
        function_coverage_percent: 0,
    };

    if let Some(graph) = graph {
        for file in graph.files() {
            if classifier.is_test_file(file) {
                continue;
            }
            summary.total_files += 1;
            let mut file_covered = false;
            for &idx in graph.get_file_nodes(file) {
                summary.total_functions += 1;
                if mapping.is_covered(graph.node(idx).id.as_str()) {
                    summary.covered_functions += 1;
                    file_covered = true;
                }
            }
            if file_covered {
                summary.covered_files += 1;
            }
        }
        summary.file_coverage_percent = percent(summary.covered_files, summary.total_files, 0);
        summary.function_coverage_percent =
            percent(summary.covered_functions, summary.total_functions, 0);
    }

    summary
}
