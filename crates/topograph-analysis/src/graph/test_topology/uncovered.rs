//! Risk scoring for functions no test reaches.

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};

use crate::call_graph::{CallGraph, FunctionNode};

use super::test_files::TestFileClassifier;
use super::types::{CoverageMapping, RiskLevel, UncoveredFunction, UncoveredReason};

/// Name fragments of framework lifecycle hooks, matched case-insensitively.
const FRAMEWORK_HOOKS: &[&str] = &[
    "constructor",
    "__init__",
    "init",
    "setup",
    "teardown",
    "mount",
    "unmount",
    "componentDid",
    "componentWill",
    "ngOn",
    "useEffect",
    "beforeEach",
    "afterEach",
    "beforeAll",
    "afterAll",
    "onCreate",
    "onDestroy",
    "render",
];

static HOOK_MATCHER: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(FRAMEWORK_HOOKS)
        .ok()
});

const BASE_RISK: u32 = 30;
const ENTRY_POINT_RISK: u32 = 30;
const DATA_ACCESS_RISK: u32 = 20;
const MANY_CALLERS_RISK: u32 = 15;
const MANY_CALLEES_RISK: u32 = 10;
const MANY_CALLERS: usize = 5;
const MANY_CALLEES: usize = 10;
const MAX_RISK: u32 = 100;

/// Risk score in 30..=100.
///
/// 30 base, +30 entry point, +20 data access, +15 for more than 5 callers,
/// +10 for more than 10 outgoing call sites.
pub fn compute_risk_score(node: &FunctionNode) -> u32 {
    let mut score = BASE_RISK;
    if node.is_entry_point {
        score += ENTRY_POINT_RISK;
    }
    if !node.data_access.is_empty() {
        score += DATA_ACCESS_RISK;
    }
    if node.called_by.len() > MANY_CALLERS {
        score += MANY_CALLERS_RISK;
    }
    if node.calls.len() > MANY_CALLEES {
        score += MANY_CALLEES_RISK;
    }
    score.min(MAX_RISK)
}

/// Reasons a function may legitimately lack tests.
pub fn possible_reasons(node: &FunctionNode) -> Vec<UncoveredReason> {
    let mut reasons = Vec::new();
    if node.called_by.is_empty() && !node.is_entry_point {
        reasons.push(UncoveredReason::DeadCode);
    }
    if HOOK_MATCHER
        .as_ref()
        .is_some_and(|ac| ac.is_match(node.name.as_str()))
    {
        reasons.push(UncoveredReason::FrameworkHook);
    }
    let lower = node.name.to_lowercase();
    if lower.starts_with("get") || lower.starts_with("set") {
        reasons.push(UncoveredReason::Trivial);
    }
    reasons
}

/// Uncovered non-test functions at or above `min_risk`, riskiest first,
/// ties ordered by file, line, then id. At most `limit` are returned.
pub fn find_uncovered_functions(
    graph: &CallGraph,
    mapping: &CoverageMapping,
    classifier: &TestFileClassifier,
    min_risk: RiskLevel,
    limit: usize,
    include_reasons: bool,
) -> Vec<UncoveredFunction> {
    let threshold = min_risk.threshold();

    let mut uncovered: Vec<UncoveredFunction> = graph
        .functions()
        .map(|(_, node)| node)
        .filter(|node| !classifier.is_test_file(&node.file))
        .filter(|node| !mapping.is_covered(node.id.as_str()))
        .filter_map(|node| {
            let risk_score = compute_risk_score(node);
            if risk_score < threshold {
                return None;
            }
            Some(UncoveredFunction {
                function_id: node.id.clone(),
                name: node.name.clone(),
                qualified_name: node.qualified_name.clone(),
                file: node.file.clone(),
                line: node.start_line,
                risk_score,
                possible_reasons: if include_reasons {
                    possible_reasons(node)
                } else {
                    Vec::new()
                },
            })
        })
        .collect();

    uncovered.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.function_id.cmp(&b.function_id))
    });
    uncovered.truncate(limit);
    uncovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::CallSiteRef;
    use topograph_core::types::FunctionId;

    fn node(name: &str) -> FunctionNode {
        FunctionNode {
            id: FunctionId::new(name),
            name: name.to_string(),
            file: "src/lib.ts".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn risk_score_components_add_up_and_cap() {
        let mut n = node("process");
        assert_eq!(compute_risk_score(&n), 30);

        n.is_entry_point = true;
        n.data_access.push("users".to_string());
        assert_eq!(compute_risk_score(&n), 80);

        n.called_by = (0..6).map(|i| FunctionId::new(format!("c{i}"))).collect();
        n.calls = (0..11).map(|i| CallSiteRef::to([format!("d{i}")])).collect();
        assert_eq!(compute_risk_score(&n), 100);
    }

    #[test]
    fn thresholds_are_strictly_greater_than() {
        let mut n = node("process");
        n.called_by = (0..5).map(|i| FunctionId::new(format!("c{i}"))).collect();
        n.calls = (0..10).map(|i| CallSiteRef::to([format!("d{i}")])).collect();
        assert_eq!(compute_risk_score(&n), 30);
    }

    #[test]
    fn reasons_cover_dead_code_hooks_and_accessors() {
        let n = node("componentDidMount");
        let reasons = possible_reasons(&n);
        assert!(reasons.contains(&UncoveredReason::DeadCode));
        assert!(reasons.contains(&UncoveredReason::FrameworkHook));
        assert!(!reasons.contains(&UncoveredReason::Trivial));

        let mut n = node("getUser");
        n.called_by.push(FunctionId::new("main"));
        assert_eq!(possible_reasons(&n), vec![UncoveredReason::Trivial]);

        let mut n = node("main");
        n.is_entry_point = true;
        assert!(possible_reasons(&n).is_empty());
    }
}
