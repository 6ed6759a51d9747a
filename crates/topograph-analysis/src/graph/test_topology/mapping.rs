//! Bipartite mapping builder: direct resolution plus BFS transitive closure.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use petgraph::graph::NodeIndex;
use topograph_core::tracing::metrics;
use topograph_core::types::{FunctionId, FxHashMap, FxHashSet};

use crate::call_graph::CallGraph;
use crate::extraction::TestExtraction;

use super::resolver::{FunctionResolver, Resolution};
use super::types::{CoverageMapping, MappingStats, TestRef};

/// Rebuild `mapping` from scratch over every stored extraction.
///
/// Clears both mapping directions and every test case's `transitive_calls`,
/// resolves each direct call name, then closes each test's direct set over
/// the call graph. Without a graph no name can resolve, so every test is
/// registered with an empty function set.
pub fn build_coverage_mapping(
    extractions: &mut BTreeMap<String, TestExtraction>,
    graph: Option<&CallGraph>,
    mapping: &mut CoverageMapping,
) -> MappingStats {
    let start = Instant::now();
    mapping.clear();
    let mut stats = MappingStats::default();
    let mut resolver = graph.map(FunctionResolver::new);

    for extraction in extractions.values_mut() {
        for test in &mut extraction.test_cases {
            test.transitive_calls.clear();
            mapping.tests.insert(
                test.id.clone(),
                TestRef {
                    file: extraction.file.clone(),
                    name: test.name.clone(),
                    qualified_name: test.qualified_name.clone(),
                },
            );
            mapping.test_to_functions.entry(test.id.clone()).or_default();

            let mut direct: FxHashMap<FunctionId, Resolution> = FxHashMap::default();
            for raw in &test.direct_calls {
                let resolved = resolver
                    .as_mut()
                    .and_then(|r| r.resolve(raw, &extraction.file));
                let Some(resolved) = resolved else {
                    stats.unresolved_calls += 1;
                    continue;
                };
                if resolved.resolution.is_ambiguous() {
                    stats.ambiguous_calls += 1;
                    tracing::debug!(
                        test = test.display_name(),
                        call = %raw,
                        function = %resolved.function_id,
                        "ambiguous call resolution"
                    );
                }
                // A function resolved twice keeps its strongest resolution.
                direct
                    .entry(resolved.function_id.clone())
                    .and_modify(|existing| {
                        if resolved.resolution.confidence() > existing.confidence() {
                            *existing = resolved.resolution;
                        }
                    })
                    .or_insert(resolved.resolution);
                if mapping.link(&test.id, &resolved.function_id) {
                    stats.direct_edges += 1;
                }
            }

            if !direct.is_empty() {
                stats.tests_mapped += 1;
            }

            if let Some(graph) = graph {
                let mut ids: Vec<&FunctionId> = direct.keys().collect();
                ids.sort();
                let starts: Vec<NodeIndex> =
                    ids.into_iter().filter_map(|id| graph.get_node(id.as_str())).collect();
                for idx in reachable_from(graph, &starts) {
                    let id = &graph.node(idx).id;
                    if mapping.link(&test.id, id) {
                        stats.transitive_edges += 1;
                        test.transitive_calls.push(id.clone());
                    }
                }
            }

            mapping.direct.insert(test.id.clone(), direct);
        }
    }

    stats.duration = start.elapsed();
    tracing::info!(
        { metrics::TESTS_MAPPED } = stats.tests_mapped,
        { metrics::DIRECT_EDGES } = stats.direct_edges,
        { metrics::TRANSITIVE_EDGES } = stats.transitive_edges,
        { metrics::UNRESOLVED_CALLS } = stats.unresolved_calls,
        { metrics::AMBIGUOUS_CALLS } = stats.ambiguous_calls,
        { metrics::MAPPING_BUILD_TIME } = stats.duration.as_millis() as u64,
        "test topology mapping built"
    );
    stats
}

/// Functions reachable from `starts` through one or more call edges,
/// excluding the starts themselves, in BFS discovery order.
///
/// Every candidate of a polymorphic call site is an edge, so all of them are
/// followed. The visited set guarantees termination on cycles.
pub fn reachable_from(graph: &CallGraph, starts: &[NodeIndex]) -> Vec<NodeIndex> {
    let mut visited: FxHashSet<NodeIndex> = starts.iter().copied().collect();
    let mut queue: VecDeque<NodeIndex> = starts.iter().copied().collect();
    let mut discovered = Vec::new();

    while let Some(current) = queue.pop_front() {
        for callee in graph.callees(current) {
            if visited.insert(callee) {
                discovered.push(callee);
                queue.push_back(callee);
            }
        }
    }

    discovered
}
