//! Call-site name → function id resolution.
//!
//! Candidates are functions whose `name` equals the raw call-site string or
//! whose `qualified_name` ends with it at a segment boundary. Ties are broken
//! in order: SameFile → SameDirectory → Unique. Anything still tied is
//! Ambiguous and resolves to the lexicographically smallest id.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use topograph_core::types::{FunctionId, FxHashMap};

use crate::call_graph::{normalize_path, CallGraph};

/// Characters that may precede a qualified-name suffix match.
const SEGMENT_SEPARATORS: &[char] = &['.', ':', '#', '/'];

/// How a call-site name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Candidate defined in the caller's file. Confidence: 0.95.
    SameFile,
    /// Candidate defined in the caller's directory. Confidence: 0.85.
    SameDirectory,
    /// Only one candidate in the project. Confidence: 0.90.
    Unique,
    /// Several candidates and no rule separated them. Confidence: 0.40.
    Ambiguous,
}

impl Resolution {
    /// Confidence attached to this resolution kind.
    pub fn confidence(&self) -> f32 {
        match self {
            Self::SameFile => 0.95,
            Self::SameDirectory => 0.85,
            Self::Unique => 0.90,
            Self::Ambiguous => 0.40,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous)
    }
}

/// A resolved call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCall {
    pub function_id: FunctionId,
    pub resolution: Resolution,
}

/// Resolves raw call-site names against one call graph.
///
/// Candidate lists are memoized per raw name, so a name shared by many tests
/// is scanned once per build.
pub struct FunctionResolver<'g> {
    graph: &'g CallGraph,
    by_name: FxHashMap<&'g str, Vec<NodeIndex>>,
    candidates: FxHashMap<String, Vec<NodeIndex>>,
}

impl<'g> FunctionResolver<'g> {
    pub fn new(graph: &'g CallGraph) -> Self {
        let mut by_name: FxHashMap<&'g str, Vec<NodeIndex>> = FxHashMap::default();
        for (idx, node) in graph.functions() {
            by_name.entry(node.name.as_str()).or_default().push(idx);
        }
        Self {
            graph,
            by_name,
            candidates: FxHashMap::default(),
        }
    }

    /// Resolve `raw` as called from a test in `caller_file`.
    pub fn resolve(&mut self, raw: &str, caller_file: &str) -> Option<ResolvedCall> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if !self.candidates.contains_key(raw) {
            let found = self.collect_candidates(raw);
            self.candidates.insert(raw.to_string(), found);
        }
        let candidates = self.candidates.get(raw)?;
        pick(self.graph, candidates, &normalize_path(caller_file))
    }

    /// Sorted by function id, deduplicated.
    fn collect_candidates(&self, raw: &str) -> Vec<NodeIndex> {
        let mut found: Vec<NodeIndex> = self.by_name.get(raw).cloned().unwrap_or_default();
        for (idx, node) in self.graph.functions() {
            if qualified_suffix_match(&node.qualified_name, raw) {
                found.push(idx);
            }
        }
        found.sort_by(|a, b| self.graph.node(*a).id.cmp(&self.graph.node(*b).id));
        found.dedup();
        found
    }
}

fn pick(graph: &CallGraph, candidates: &[NodeIndex], caller_file: &str) -> Option<ResolvedCall> {
    let first = *candidates.first()?;
    let caller_dir = parent_dir(caller_file);

    let same_file: Vec<NodeIndex> = candidates
        .iter()
        .copied()
        .filter(|&idx| graph.node(idx).file == caller_file)
        .collect();
    if let Some(resolved) = narrow(graph, &same_file, Resolution::SameFile) {
        return Some(resolved);
    }

    let same_dir: Vec<NodeIndex> = candidates
        .iter()
        .copied()
        .filter(|&idx| parent_dir(&graph.node(idx).file) == caller_dir)
        .collect();
    if let Some(resolved) = narrow(graph, &same_dir, Resolution::SameDirectory) {
        return Some(resolved);
    }

    let resolution = if candidates.len() == 1 {
        Resolution::Unique
    } else {
        Resolution::Ambiguous
    };
    Some(ResolvedCall {
        function_id: graph.node(first).id.clone(),
        resolution,
    })
}

/// One survivor wins with `kind`; several survivors are Ambiguous on the smallest id.
fn narrow(graph: &CallGraph, survivors: &[NodeIndex], kind: Resolution) -> Option<ResolvedCall> {
    let first = *survivors.first()?;
    let resolution = if survivors.len() == 1 {
        kind
    } else {
        Resolution::Ambiguous
    };
    Some(ResolvedCall {
        function_id: graph.node(first).id.clone(),
        resolution,
    })
}

/// `qualified` equals `raw`, or ends with it right after a segment separator.
fn qualified_suffix_match(qualified: &str, raw: &str) -> bool {
    if qualified == raw {
        return true;
    }
    match qualified.strip_suffix(raw) {
        Some(prefix) => prefix.ends_with(SEGMENT_SEPARATORS),
        None => false,
    }
}

fn parent_dir(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[..pos],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::FunctionNode;

    fn func(id: &str, name: &str, qualified: &str, file: &str) -> FunctionNode {
        FunctionNode {
            id: FunctionId::new(id),
            name: name.to_string(),
            qualified_name: qualified.to_string(),
            file: file.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn suffix_match_requires_segment_boundary() {
        assert!(qualified_suffix_match("UserService.save", "save"));
        assert!(qualified_suffix_match("app::db::save", "db::save"));
        assert!(qualified_suffix_match("User#save", "save"));
        assert!(qualified_suffix_match("save", "save"));
        assert!(!qualified_suffix_match("autosave", "save"));
        assert!(!qualified_suffix_match("UserService.save", "Service.save"));
    }

    #[test]
    fn unique_candidate_resolves_unique() {
        let graph = CallGraph::from_functions(
            vec![func("src/a.ts:login", "login", "Auth.login", "src/a.ts")],
            Vec::<FunctionId>::new(),
        );
        let mut resolver = FunctionResolver::new(&graph);
        let resolved = resolver.resolve("login", "tests/a.test.ts").unwrap();
        assert_eq!(resolved.function_id.as_str(), "src/a.ts:login");
        assert_eq!(resolved.resolution, Resolution::Unique);
        assert!(resolver.resolve("logout", "tests/a.test.ts").is_none());
    }

    #[test]
    fn same_file_beats_same_directory_beats_project() {
        let graph = CallGraph::from_functions(
            vec![
                func("a", "parse", "parse", "lib/other/p.py"),
                func("b", "parse", "parse", "lib/core/p.py"),
                func("c", "parse", "parse", "lib/core/test_p.py"),
            ],
            Vec::<FunctionId>::new(),
        );
        let mut resolver = FunctionResolver::new(&graph);

        let r = resolver.resolve("parse", "lib/core/test_p.py").unwrap();
        assert_eq!((r.function_id.as_str(), r.resolution), ("c", Resolution::SameFile));

        let r = resolver.resolve("parse", "lib/other/test_q.py").unwrap();
        assert_eq!((r.function_id.as_str(), r.resolution), ("a", Resolution::SameDirectory));

        let r = resolver.resolve("parse", "tests/test_p.py").unwrap();
        assert_eq!((r.function_id.as_str(), r.resolution), ("a", Resolution::Ambiguous));
    }

    #[test]
    fn locality_ignores_separator_and_dot_prefix_differences() {
        let graph = CallGraph::from_functions(
            vec![
                func("a", "parse", "parse", "./lib/other/p.py"),
                func("c", "parse", "parse", "lib\\core\\test_p.py"),
            ],
            Vec::<FunctionId>::new(),
        );
        let mut resolver = FunctionResolver::new(&graph);

        let r = resolver.resolve("parse", "lib\\core\\test_p.py").unwrap();
        assert_eq!((r.function_id.as_str(), r.resolution), ("c", Resolution::SameFile));

        let r = resolver.resolve("parse", "./lib/core/test_p.py").unwrap();
        assert_eq!((r.function_id.as_str(), r.resolution), ("c", Resolution::SameFile));

        let r = resolver.resolve("parse", "lib\\other\\test_q.py").unwrap();
        assert_eq!((r.function_id.as_str(), r.resolution), ("a", Resolution::SameDirectory));
    }

    #[test]
    fn tied_same_directory_is_ambiguous_on_smallest_id() {
        let graph = CallGraph::from_functions(
            vec![
                func("src/z.ts:run", "run", "Z.run", "src/z.ts"),
                func("src/y.ts:run", "run", "Y.run", "src/y.ts"),
            ],
            Vec::<FunctionId>::new(),
        );
        let mut resolver = FunctionResolver::new(&graph);
        let r = resolver.resolve("run", "src/run.test.ts").unwrap();
        assert_eq!(r.function_id.as_str(), "src/y.ts:run");
        assert!(r.resolution.is_ambiguous());
        assert_eq!(r.resolution.confidence(), 0.40);
    }
}
