//! Extraction record types: test cases, mocks, setup blocks, quality signals.

use serde::{Deserialize, Serialize};
use topograph_core::errors::ExtractionError;
use topograph_core::types::{FunctionId, TestId};

/// Source language of a test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Java,
    CSharp,
    Go,
    Rust,
    Php,
    Ruby,
    Cpp,
    #[default]
    Unknown,
}

impl Language {
    /// Get language from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "py" | "pyi" => Self::Python,
            "java" => Self::Java,
            "cs" => Self::CSharp,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "php" => Self::Php,
            "rb" => Self::Ruby,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Self::Cpp,
            _ => Self::Unknown,
        }
    }

    /// Get language from file path.
    pub fn from_path(path: &str) -> Self {
        path.rsplit_once('.')
            .map(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(Self::Unknown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Cpp => "cpp",
            Self::Unknown => "unknown",
        }
    }
}

/// Test framework, spanning the supported language ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    // JavaScript/TypeScript
    Jest,
    Vitest,
    Mocha,
    // Python
    Pytest,
    Unittest,
    // Java
    JUnit,
    TestNG,
    // C#
    NUnit,
    XUnit,
    MSTest,
    // Go
    GoTest,
    // Rust
    RustTest,
    // PHP
    PHPUnit,
    // Ruby
    RSpec,
    Minitest,
    // C++
    Catch2,
    GoogleTest,
    #[default]
    Unknown,
}

impl TestFramework {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jest => "jest",
            Self::Vitest => "vitest",
            Self::Mocha => "mocha",
            Self::Pytest => "pytest",
            Self::Unittest => "unittest",
            Self::JUnit => "junit",
            Self::TestNG => "testng",
            Self::NUnit => "nunit",
            Self::XUnit => "xunit",
            Self::MSTest => "mstest",
            Self::GoTest => "gotest",
            Self::RustTest => "rusttest",
            Self::PHPUnit => "phpunit",
            Self::RSpec => "rspec",
            Self::Minitest => "minitest",
            Self::Catch2 => "catch2",
            Self::GoogleTest => "googletest",
            Self::Unknown => "unknown",
        }
    }

    /// Every framework, in reporting order.
    pub fn all() -> &'static [TestFramework] {
        &[
            Self::Jest, Self::Vitest, Self::Mocha,
            Self::Pytest, Self::Unittest,
            Self::JUnit, Self::TestNG,
            Self::NUnit, Self::XUnit, Self::MSTest,
            Self::GoTest, Self::RustTest, Self::PHPUnit,
            Self::RSpec, Self::Minitest,
            Self::Catch2, Self::GoogleTest,
            Self::Unknown,
        ]
    }
}

/// Quality signals precomputed by the extractor. The engine reads them, never recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySignals {
    pub assertion_count: u32,
    pub has_error_cases: bool,
    pub has_edge_cases: bool,
    /// Mocks relative to real calls (0.0-1.0).
    pub mock_ratio: f64,
    /// Setup lines relative to test body (0.0-1.0).
    pub setup_ratio: f64,
    /// Overall score (0-100).
    pub score: u32,
}

/// An assertion inside a test body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertionInfo {
    pub matcher: String,
    pub line: u32,
    pub is_error_assertion: bool,
    pub is_edge_case: bool,
}

/// A single test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    /// Unique id: `file:name:line`.
    pub id: TestId,
    pub name: String,
    /// Name including enclosing describe/class blocks.
    pub qualified_name: String,
    pub parent_block: Option<String>,
    pub line: u32,
    /// Raw call-site names found directly in the test body (unresolved).
    pub direct_calls: Vec<String>,
    /// Functions reached through the call graph; filled in by the engine.
    pub transitive_calls: Vec<FunctionId>,
    pub assertions: Vec<AssertionInfo>,
    pub quality: QualitySignals,
    pub is_skipped: bool,
}

impl TestCase {
    /// Build the canonical test id for a test at `line` of `file`.
    pub fn make_id(file: &str, name: &str, line: u32) -> TestId {
        TestId::from(format!("{file}:{name}:{line}"))
    }

    /// Display name: qualified name when present.
    pub fn display_name(&self) -> &str {
        if self.qualified_name.is_empty() {
            &self.name
        } else {
            &self.qualified_name
        }
    }
}

/// Mock kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockType {
    Function,
    Module,
    Class,
    Http,
    Database,
    #[default]
    Unknown,
}

/// A mock/stub/spy statement in a test file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockStatement {
    /// What is being mocked (module path, function, or class name).
    pub target: String,
    pub mock_type: MockType,
    pub line: u32,
    /// Whether the target lives outside the project (set by the extractor).
    pub is_external: bool,
    pub source: Option<String>,
}

/// Setup/teardown hook kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupKind {
    #[default]
    BeforeEach,
    AfterEach,
    BeforeAll,
    AfterAll,
    SetUp,
    TearDown,
    Fixture,
}

/// A setup or teardown block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupBlock {
    pub kind: SetupKind,
    pub line: u32,
    pub calls: Vec<String>,
}

/// A named fixture (pytest fixtures, JUnit rules, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub name: String,
    pub scope: Option<String>,
    pub line: u32,
}

/// Everything extracted from one test file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestExtraction {
    pub file: String,
    pub framework: TestFramework,
    pub language: Language,
    pub test_cases: Vec<TestCase>,
    pub mocks: Vec<MockStatement>,
    pub setup_blocks: Vec<SetupBlock>,
    pub fixtures: Option<Vec<Fixture>>,
}

impl TestExtraction {
    /// An empty extraction for `file`, with the language inferred from its extension.
    pub fn new(file: impl Into<String>, framework: TestFramework) -> Self {
        let file = file.into();
        Self {
            language: Language::from_path(&file),
            file,
            framework,
            ..Self::default()
        }
    }

    /// Decode an extraction record from JSON.
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        serde_json::from_str(json).map_err(|e| ExtractionError::InvalidJson {
            message: e.to_string(),
        })
    }

    /// Whether any mock in this file targets `name` or `qualified_name`.
    pub fn mocks_function(&self, name: &str, qualified_name: &str) -> bool {
        self.mocks.iter().any(|m| {
            (!name.is_empty() && m.target.contains(name))
                || (!qualified_name.is_empty() && m.target.contains(qualified_name))
        })
    }
}
