//! TestExtractor capability and the registry that dispatches to it.

use topograph_core::types::FxHashSet;
use topograph_core::errors::ExtractionError;

use super::types::TestExtraction;

/// Turns the source text of one test file into a `TestExtraction`.
///
/// One implementation per language ecosystem; the engine never looks at
/// source text itself.
pub trait TestExtractor: Send + Sync {
    /// Unique identifier for this extractor.
    fn id(&self) -> &str;

    /// Whether this extractor handles `path`.
    fn supports(&self, path: &str) -> bool;

    /// Extract test facts from `content`.
    fn extract(&self, content: &str, path: &str) -> Result<TestExtraction, ExtractionError>;
}

/// Registry of extractors with enable/disable by id. First supporting extractor wins.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TestExtractor>>,
    disabled: FxHashSet<String>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor. Registration order decides precedence.
    pub fn register(&mut self, extractor: Box<dyn TestExtractor>) {
        self.extractors.push(extractor);
    }

    /// Disable a specific extractor by id.
    pub fn disable(&mut self, id: &str) {
        self.disabled.insert(id.to_string());
    }

    /// Enable a previously disabled extractor.
    pub fn enable(&mut self, id: &str) {
        self.disabled.remove(id);
    }

    /// Number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// The first enabled extractor supporting `path`.
    pub fn find(&self, path: &str) -> Option<&dyn TestExtractor> {
        self.extractors
            .iter()
            .map(|e| e.as_ref())
            .find(|e| !self.disabled.contains(e.id()) && e.supports(path))
    }

    /// Extract `content` with the first supporting extractor.
    ///
    /// A panicking extractor is reported as `Malformed` rather than unwinding
    /// through the engine. This only holds with `panic = "unwind"`; the release
    /// profile aborts on panic, so there an extractor panic ends the process.
    pub fn extract(&self, content: &str, path: &str) -> Result<TestExtraction, ExtractionError> {
        let extractor = self.find(path).ok_or_else(|| ExtractionError::UnsupportedFile {
            path: path.to_string(),
        })?;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            extractor.extract(content, path)
        }));
        match result {
            Ok(extraction) => extraction,
            Err(_) => {
                tracing::error!(extractor = extractor.id(), path, "extractor panicked");
                Err(ExtractionError::Malformed {
                    path: path.to_string(),
                    message: format!("extractor '{}' panicked", extractor.id()),
                })
            }
        }
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.extractors.iter().map(|e| e.id()).collect::<Vec<_>>())
            .field("disabled", &self.disabled)
            .finish()
    }
}
