//! The owning index object for one analysis run.

use std::collections::BTreeMap;
use std::path::Path;

use topograph_core::config::{TopographConfig, TopologyConfig};
use topograph_core::errors::TopologyError;
use topograph_core::tracing::metrics;
use topograph_core::types::{FunctionId, FxHashSet, TestId};
use tracing::instrument;

use crate::call_graph::{normalize_path, CallGraph};
use crate::extraction::{ExtractorRegistry, TestCase, TestExtraction, TestExtractor};

use super::coverage::compute_file_coverage;
use super::mapping::build_coverage_mapping;
use super::minimum_set::{compute_minimum_covering_set, select_tests_for_changes};
use super::mocks::analyze_mocks;
use super::summary::compute_summary;
use super::test_files::TestFileClassifier;
use super::types::{
    CoverageMapping, CoveringTestSet, MappingStats, MinimumTestSet, MockAnalysis,
    RiskLevel, TestCoverage, TestTopologySummary, UncoveredFunction, UncoveredOptions,
};
use super::uncovered::find_uncovered_functions;

/// Test topology analyzer.
///
/// Usage order: ingest extractions → `set_call_graph` → `build_mappings` →
/// queries. Mutation goes through `&mut self`; queries take `&self` and
/// never fail.
#[derive(Debug)]
pub struct TestTopologyAnalyzer {
    config: TopologyConfig,
    classifier: TestFileClassifier,
    extractors: ExtractorRegistry,
    extractions: BTreeMap<String, TestExtraction>,
    call_graph: Option<CallGraph>,
    mapping: CoverageMapping,
    /// Bumped on every `set_call_graph`.
    graph_generation: u64,
    /// Graph generation the current mapping was built against.
    built_generation: Option<u64>,
}

impl TestTopologyAnalyzer {
    pub fn new() -> Self {
        Self::with_config(TopologyConfig::default())
    }

    pub fn with_config(config: TopologyConfig) -> Self {
        let classifier = TestFileClassifier::with_patterns(&config.extra_test_patterns);
        Self {
            config,
            classifier,
            extractors: ExtractorRegistry::new(),
            extractions: BTreeMap::new(),
            call_graph: None,
            mapping: CoverageMapping::default(),
            graph_generation: 0,
            built_generation: None,
        }
    }

    /// Analyzer configured from the layered config rooted at `root`
    /// (`topograph.toml`, `~/.topograph/config.toml`, `TOPOGRAPH_*`).
    pub fn from_project(root: &Path) -> Result<Self, TopologyError> {
        let config = TopographConfig::load(root, None)?;
        Ok(Self::with_config(config.topology))
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    /// Register a per-language extractor. Earlier registrations win when
    /// several support the same path.
    pub fn register_extractor(&mut self, extractor: Box<dyn TestExtractor>) {
        self.extractors.register(extractor);
    }

    /// Mutable access to the extractor registry (enable/disable by id).
    pub fn extractors_mut(&mut self) -> &mut ExtractorRegistry {
        &mut self.extractors
    }

    /// Extract test facts from `content` with the first extractor that
    /// supports `path`, store the record, and return a copy of it.
    ///
    /// Returns `None` (logged at warn) when no extractor applies or the
    /// extractor fails; nothing is stored in that case.
    pub fn extract_from_file(&mut self, content: &str, path: &str) -> Option<TestExtraction> {
        match self.extractors.extract(content, path) {
            Ok(mut extraction) => {
                if extraction.file.is_empty() {
                    extraction.file = path.to_string();
                }
                Some(self.ingest(extraction).clone())
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "test extraction failed");
                None
            }
        }
    }

    /// Store a pre-extracted record, replacing any record for the same file.
    /// The file path is normalized; test cases without an id get `file:name:line`.
    pub fn ingest(&mut self, mut extraction: TestExtraction) -> &TestExtraction {
        extraction.file = normalize_path(&extraction.file);
        for test in &mut extraction.test_cases {
            if test.id.as_str().is_empty() {
                test.id = TestCase::make_id(&extraction.file, &test.name, test.line);
            }
        }
        let file = extraction.file.clone();
        if self.extractions.contains_key(&file) {
            tracing::debug!(file = %file, "replacing stored extraction");
        }
        self.extractions.insert(file.clone(), extraction);
        &self.extractions[&file]
    }

    /// Decode and store an extraction record produced out of process.
    pub fn ingest_json(&mut self, json: &str) -> Result<&TestExtraction, TopologyError> {
        let extraction = TestExtraction::from_json(json)?;
        Ok(self.ingest(extraction))
    }

    /// Load a call graph JSON file and install it.
    pub fn load_call_graph(&mut self, path: &Path) -> Result<(), TopologyError> {
        let graph = CallGraph::from_json_file(path)?;
        self.set_call_graph(graph);
        Ok(())
    }

    /// Install the call graph. Existing mappings are stale until the next
    /// `build_mappings`.
    pub fn set_call_graph(&mut self, graph: CallGraph) {
        tracing::debug!(
            { metrics::GRAPH_FUNCTIONS } = graph.function_count(),
            "call graph installed"
        );
        self.call_graph = Some(graph);
        self.graph_generation += 1;
    }

    /// Rebuild the test ↔ function mapping from scratch.
    #[instrument(skip(self), fields(test_files = self.extractions.len()))]
    pub fn build_mappings(&mut self) -> MappingStats {
        let stats = build_coverage_mapping(
            &mut self.extractions,
            self.call_graph.as_ref(),
            &mut self.mapping,
        );
        self.built_generation = Some(self.graph_generation);
        stats
    }

    /// Coverage report for one source file; `None` without a call graph.
    pub fn get_coverage(&self, source_file: &str) -> Option<TestCoverage> {
        let graph = self.graph_for_query()?;
        let file = normalize_path(source_file);
        Some(compute_file_coverage(
            graph,
            &self.mapping,
            &self.extractions,
            &file,
        ))
    }

    /// Uncovered non-test functions ranked by risk; empty without a call graph.
    pub fn get_uncovered_functions(&self, options: UncoveredOptions) -> Vec<UncoveredFunction> {
        let Some(graph) = self.graph_for_query() else {
            return Vec::new();
        };
        let min_risk = options
            .min_risk
            .unwrap_or_else(|| RiskLevel::parse(self.config.effective_min_risk()));
        let limit = options
            .limit
            .unwrap_or_else(|| self.config.effective_uncovered_limit());
        find_uncovered_functions(
            graph,
            &self.mapping,
            &self.classifier,
            min_risk,
            limit,
            options.include_reasons,
        )
    }

    /// Tests to run for a change set.
    #[instrument(skip(self, changed_files), fields(changed_files = changed_files.len()))]
    pub fn get_minimum_test_set(&self, changed_files: &[String]) -> MinimumTestSet {
        let empty;
        let graph = match self.graph_for_query() {
            Some(graph) => graph,
            None => {
                empty = CallGraph::new();
                &empty
            }
        };
        let set = select_tests_for_changes(
            graph,
            &self.mapping,
            &self.extractions,
            changed_files,
            self.config.effective_ms_per_test(),
        );
        tracing::debug!(
            { metrics::SELECTED_TESTS } = set.selected_tests,
            total_tests = set.total_tests,
            "test impact analysis"
        );
        set
    }

    /// Greedy subset of tests that still covers every covered function.
    pub fn get_minimum_covering_set(&self) -> CoveringTestSet {
        self.warn_if_stale();
        compute_minimum_covering_set(&self.mapping)
    }

    pub fn analyze_mocks(&self) -> MockAnalysis {
        analyze_mocks(
            &self.extractions,
            self.config.effective_high_mock_ratio(),
            self.config.effective_top_mocked_modules(),
        )
    }

    pub fn get_summary(&self) -> TestTopologySummary {
        compute_summary(
            &self.extractions,
            self.graph_for_query(),
            &self.mapping,
            &self.classifier,
        )
    }

    /// Stored extraction for `file`.
    pub fn extraction(&self, file: &str) -> Option<&TestExtraction> {
        self.extractions.get(&normalize_path(file))
    }

    /// All stored extractions, ordered by file.
    pub fn extractions(&self) -> impl Iterator<Item = &TestExtraction> {
        self.extractions.values()
    }

    /// Every function `test_id` reaches, directly or transitively.
    pub fn functions_for_test(&self, test_id: &str) -> Option<&FxHashSet<FunctionId>> {
        self.mapping.test_to_functions.get(test_id)
    }

    /// Every test reaching `function_id`.
    pub fn tests_for_function(&self, function_id: &str) -> Option<&FxHashSet<TestId>> {
        self.mapping.tests_for(function_id)
    }

    /// Stored test case by id.
    pub fn test_case(&self, test_id: &str) -> Option<&TestCase> {
        let file = &self.mapping.tests.get(test_id)?.file;
        self.extractions
            .get(file)?
            .test_cases
            .iter()
            .find(|t| t.id.as_str() == test_id)
    }

    pub fn call_graph(&self) -> Option<&CallGraph> {
        self.call_graph.as_ref()
    }

    /// The bipartite index as of the last `build_mappings`.
    pub fn mapping(&self) -> &CoverageMapping {
        &self.mapping
    }

    fn graph_for_query(&self) -> Option<&CallGraph> {
        let graph = self.call_graph.as_ref()?;
        self.warn_if_stale();
        Some(graph)
    }

    fn warn_if_stale(&self) {
        if self.call_graph.is_some() && self.built_generation != Some(self.graph_generation) {
            tracing::warn!(
                graph_generation = self.graph_generation,
                built_generation = ?self.built_generation,
                "querying test topology built against a different call graph; call build_mappings"
            );
        }
    }
}

impl Default for TestTopologyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
