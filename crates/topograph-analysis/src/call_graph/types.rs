//! Call graph types: function nodes, call sites, petgraph-backed index.

use std::collections::BTreeMap;
use std::path::Path;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};
use topograph_core::errors::CallGraphError;
use topograph_core::types::collections::{FxHashMap, SmallVec2, SmallVec4};
use topograph_core::types::FunctionId;

/// A call site inside a function body.
///
/// Polymorphic call sites resolve to several candidate callees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallSiteRef {
    #[serde(default)]
    pub resolved_candidates: SmallVec4<FunctionId>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl CallSiteRef {
    /// A call site resolving to the given candidates.
    pub fn to<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FunctionId>,
    {
        Self {
            resolved_candidates: candidates.into_iter().map(Into::into).collect(),
            line: None,
        }
    }
}

/// A function node in the call graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionNode {
    pub id: FunctionId,
    pub name: String,
    pub qualified_name: String,
    pub file: String,
    pub start_line: u32,
    pub calls: Vec<CallSiteRef>,
    pub called_by: Vec<FunctionId>,
    pub data_access: SmallVec2<String>,
    pub is_entry_point: bool,
}

/// A call edge: one resolved candidate of one call site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallEdge {
    /// Index of the call site within the caller's `calls`.
    pub call_index: u32,
    /// Number of candidates the call site resolved to.
    pub fan_out: u32,
}

impl CallEdge {
    /// Whether the call site dispatches dynamically to more than one candidate.
    pub fn is_polymorphic(&self) -> bool {
        self.fan_out > 1
    }
}

/// Wire form of a call graph: functions keyed by id plus entry point ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallGraphData {
    pub functions: BTreeMap<String, FunctionNode>,
    pub entry_points: Vec<FunctionId>,
}

/// The call graph: a directed graph of function calls.
#[derive(Debug, Clone)]
pub struct CallGraph {
    /// The underlying petgraph StableGraph.
    pub graph: StableGraph<FunctionNode, CallEdge, Directed>,
    /// Map from function id → NodeIndex for O(1) lookup.
    pub node_index: FxHashMap<FunctionId, NodeIndex>,
    /// Map from file → NodeIndex list, ordered by start line.
    pub file_nodes: FxHashMap<String, Vec<NodeIndex>>,
}

impl CallGraph {
    /// Create an empty call graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: FxHashMap::default(),
            file_nodes: FxHashMap::default(),
        }
    }

    /// Build a graph from function nodes and externally designated entry points.
    ///
    /// Nodes are inserted in id order so traversal order does not depend on
    /// the caller's iteration order. Call candidates naming no known function
    /// are skipped.
    pub fn from_functions<I, E>(functions: I, entry_points: E) -> Self
    where
        I: IntoIterator<Item = FunctionNode>,
        E: IntoIterator<Item = FunctionId>,
    {
        let mut nodes: Vec<FunctionNode> = functions.into_iter().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut graph = Self::new();
        for node in nodes {
            graph.add_function(node);
        }
        for id in entry_points {
            match graph.node_index.get(&id) {
                Some(&idx) => graph.graph[idx].is_entry_point = true,
                None => tracing::debug!(function = %id, "entry point names no function"),
            }
        }

        let indices: Vec<NodeIndex> = graph.graph.node_indices().collect();
        for caller in indices {
            let mut edges = Vec::new();
            for (call_index, call) in graph.graph[caller].calls.iter().enumerate() {
                let fan_out = call.resolved_candidates.len() as u32;
                for candidate in &call.resolved_candidates {
                    match graph.node_index.get(candidate) {
                        Some(&callee) => edges.push((
                            callee,
                            CallEdge {
                                call_index: call_index as u32,
                                fan_out,
                            },
                        )),
                        None => tracing::debug!(
                            caller = %graph.graph[caller].id,
                            candidate = %candidate,
                            "skipping call candidate with no function"
                        ),
                    }
                }
            }
            for (callee, edge) in edges {
                graph.graph.add_edge(caller, callee, edge);
            }
        }

        for nodes in graph.file_nodes.values_mut() {
            nodes.sort_by_key(|&idx| graph.graph[idx].start_line);
        }

        graph
    }

    /// Decode a call graph from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, CallGraphError> {
        let data: CallGraphData =
            serde_json::from_str(json).map_err(|e| CallGraphError::InvalidJson {
                message: e.to_string(),
            })?;
        Ok(Self::from_data(data))
    }

    /// Read and decode a call graph JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CallGraphError> {
        let content = std::fs::read_to_string(path).map_err(|e| CallGraphError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Build a graph from its wire form. A node with an empty id takes its map key.
    pub fn from_data(data: CallGraphData) -> Self {
        let functions = data.functions.into_iter().map(|(key, mut node)| {
            if node.id.as_str().is_empty() {
                node.id = FunctionId::from(key);
            }
            node
        });
        Self::from_functions(functions, data.entry_points)
    }

    /// Add a function node, returning its NodeIndex. Re-adding an id is a no-op.
    /// The node's file is stored in normalized form.
    fn add_function(&mut self, mut node: FunctionNode) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(&node.id) {
            return existing;
        }
        node.file = normalize_path(&node.file);
        let id = node.id.clone();
        let file = node.file.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.file_nodes.entry(file).or_default().push(idx);
        idx
    }

    /// Number of functions (nodes) in the graph.
    pub fn function_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of call edges (one per resolved candidate).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node by function id.
    pub fn get_node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    /// Function data for a node.
    pub fn node(&self, idx: NodeIndex) -> &FunctionNode {
        &self.graph[idx]
    }

    /// Function data by id.
    pub fn function(&self, id: &str) -> Option<&FunctionNode> {
        self.get_node(id).map(|idx| &self.graph[idx])
    }

    /// All functions, in insertion (id) order.
    pub fn functions(&self) -> impl Iterator<Item = (NodeIndex, &FunctionNode)> {
        self.graph.node_indices().map(move |idx| (idx, &self.graph[idx]))
    }

    /// Nodes defined in `file`, ordered by start line.
    pub fn get_file_nodes(&self, file: &str) -> &[NodeIndex] {
        self.file_nodes
            .get(normalize_path(file).as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All files that define at least one function.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.file_nodes.keys().map(|f| f.as_str())
    }

    /// Direct callees of a node across every call site and candidate.
    pub fn callees(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Functions marked as entry points.
    pub fn entry_points(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(move |&idx| self.graph[idx].is_entry_point)
    }
}

impl Default for CallGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical file key: `/` separators, no leading `./`.
///
/// Graph nodes, stored extractions and query arguments all pass through
/// this, so `src\auth.ts`, `./src/auth.ts` and `src/auth.ts` name one file.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}
