//! Test impact analysis: change-based selection and greedy set cover.

use std::collections::BTreeMap;

use topograph_core::types::{FunctionId, FxHashSet, TestId};

use crate::call_graph::{normalize_path, CallGraph, FunctionNode};
use crate::extraction::TestExtraction;

use super::types::{percent, CoverageMapping, CoveringTestSet, MinimumTestSet, SelectedTest};

const MS_PER_MINUTE: u64 = 60_000;

/// Select every test covering at least one function defined in `changed_files`.
///
/// Sound but not optimal: each coverable changed function gets a covering
/// test, while tests covering the same function are all kept.
pub fn select_tests_for_changes(
    graph: &CallGraph,
    mapping: &CoverageMapping,
    extractions: &BTreeMap<String, TestExtraction>,
    changed_files: &[String],
    ms_per_test: u64,
) -> MinimumTestSet {
    let mut files: Vec<String> = changed_files.iter().map(|f| normalize_path(f)).collect();
    files.sort();
    files.dedup();

    let mut selected: BTreeMap<TestId, String> = BTreeMap::new();
    let mut changed_functions = 0usize;
    let mut covered_changed = 0usize;

    for file in &files {
        for &idx in graph.get_file_nodes(file) {
            let node = graph.node(idx);
            changed_functions += 1;
            let Some(tests) = mapping.tests_for(node.id.as_str()) else {
                continue;
            };
            covered_changed += 1;

            let mut tests: Vec<&TestId> = tests.iter().collect();
            tests.sort();
            for test in tests {
                selected
                    .entry(test.clone())
                    .or_insert_with(|| format!("covers {}", display_function(node)));
            }
        }
    }

    let tests: Vec<SelectedTest> = selected
        .into_iter()
        .map(|(test_id, reason)| {
            let test_ref = mapping.tests.get(test_id.as_str());
            SelectedTest {
                file: test_ref.map(|t| t.file.clone()).unwrap_or_default(),
                name: test_ref.map(|t| t.name.clone()).unwrap_or_default(),
                qualified_name: test_ref.map(|t| t.qualified_name.clone()).unwrap_or_default(),
                reason,
                test_id,
            }
        })
        .collect();

    let total_tests: usize = extractions.values().map(|e| e.test_cases.len()).sum();
    let selected_tests = tests.len();
    let time_saved_ms = total_tests.saturating_sub(selected_tests) as u64 * ms_per_test;

    MinimumTestSet {
        tests,
        total_tests,
        selected_tests,
        time_saved_ms,
        time_saved: format_duration(time_saved_ms),
        changed_functions,
        changed_code_coverage: percent(covered_changed, changed_functions, 100),
    }
}

/// Greedy set cover: repeatedly pick the test covering the most functions
/// not yet covered, until every covered function is covered.
///
/// Ties go to the smallest test id so the result is deterministic.
pub fn compute_minimum_covering_set(mapping: &CoverageMapping) -> CoveringTestSet {
    let mut uncovered: FxHashSet<&FunctionId> = mapping
        .function_to_tests
        .iter()
        .filter(|(_, tests)| !tests.is_empty())
        .map(|(f, _)| f)
        .collect();
    let total_functions = uncovered.len();

    let mut candidates: Vec<(&TestId, &FxHashSet<FunctionId>)> = mapping
        .test_to_functions
        .iter()
        .filter(|(_, functions)| !functions.is_empty())
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(b.0));

    let mut selected: Vec<TestId> = Vec::new();
    while !uncovered.is_empty() {
        let mut best: Option<(usize, usize)> = None;
        for (pos, (_, functions)) in candidates.iter().enumerate() {
            let gain = functions.iter().filter(|f| uncovered.contains(f)).count();
            if gain > best.map_or(0, |(_, g)| g) {
                best = Some((pos, gain));
            }
        }

        let Some((pos, _)) = best else {
            break;
        };
        let (test, functions) = candidates.swap_remove(pos);
        for f in functions {
            uncovered.remove(f);
        }
        selected.push(test.clone());
        // swap_remove breaks id order; restore it for the tie-break.
        candidates.sort_by(|a, b| a.0.cmp(b.0));
    }

    let covered_functions = total_functions - uncovered.len();
    let coverage_percent = if total_functions > 0 {
        covered_functions as f32 / total_functions as f32 * 100.0
    } else {
        0.0
    };

    CoveringTestSet {
        tests: selected,
        covered_functions,
        total_tests: mapping.tests.len(),
        coverage_percent,
    }
}

fn display_function(node: &FunctionNode) -> &str {
    if node.qualified_name.is_empty() {
        &node.name
    } else {
        &node.qualified_name
    }
}

/// "1.5m" at or above one minute, "3.0s" below.
pub fn format_duration(ms: u64) -> String {
    if ms >= MS_PER_MINUTE {
        format!("{:.1}m", ms as f64 / MS_PER_MINUTE as f64)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seconds_below_a_minute() {
        assert_eq!(format_duration(0), "0.0s");
        assert_eq!(format_duration(5_900), "5.9s");
        assert_eq!(format_duration(59_900), "59.9s");
    }

    #[test]
    fn formats_minutes_from_a_minute() {
        assert_eq!(format_duration(60_000), "1.0m");
        assert_eq!(format_duration(90_000), "1.5m");
    }

    #[test]
    fn covering_set_prefers_widest_test() {
        let mut mapping = CoverageMapping::default();
        let wide = TestId::new("t:wide:1");
        let narrow = TestId::new("t:narrow:2");
        for f in ["a", "b", "c"] {
            mapping.link(&wide, &FunctionId::new(f));
        }
        mapping.link(&narrow, &FunctionId::new("a"));
        mapping.link(&narrow, &FunctionId::new("d"));

        let set = compute_minimum_covering_set(&mapping);
        assert_eq!(set.tests, vec![wide, narrow]);
        assert_eq!(set.covered_functions, 4);
        assert_eq!(set.coverage_percent, 100.0);
    }
}
