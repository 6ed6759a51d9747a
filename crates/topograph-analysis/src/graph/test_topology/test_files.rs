//! Test-file classification by path convention.

use std::sync::LazyLock;

use glob::Pattern;
use regex::Regex;

/// Built-in test path conventions across ecosystems.
static TEST_PATH: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\.test\.|\.spec\.|_test\.|(^|/)test_|(^|/)tests?/|(^|/)specs?/|(^|/)__tests__/)")
        .ok()
});

/// Decides whether a file path belongs to the test suite.
#[derive(Debug, Clone)]
pub struct TestFileClassifier {
    extra: Vec<Pattern>,
}

impl TestFileClassifier {
    /// Classifier with built-in conventions only.
    pub fn new() -> Self {
        Self::with_patterns(&[])
    }

    /// Classifier with additional glob patterns. Invalid globs are skipped
    /// (config validation rejects them before they get here).
    pub fn with_patterns(patterns: &[String]) -> Self {
        let extra = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "ignoring invalid test file pattern");
                    None
                }
            })
            .collect();
        Self { extra }
    }

    /// Whether `path` is a test file.
    pub fn is_test_file(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        let builtin = TEST_PATH.as_ref().is_some_and(|re| re.is_match(&normalized));
        builtin || self.extra.iter().any(|p| p.matches(&normalized))
    }
}

impl Default for TestFileClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_builtin_conventions() {
        let c = TestFileClassifier::new();
        for path in [
            "src/user.test.ts",
            "src/user.spec.js",
            "pkg/user_test.go",
            "test_user.py",
            "app/test_user.py",
            "tests/integration.rs",
            "test/helpers.js",
            "spec/models/user_spec.rb",
            "src/__tests__/user.tsx",
            "src\\__tests__\\user.tsx",
        ] {
            assert!(c.is_test_file(path), "{path} should be a test file");
        }
    }

    #[test]
    fn leaves_source_files_alone() {
        let c = TestFileClassifier::new();
        for path in [
            "src/user.ts",
            "src/contest.ts",
            "src/latest/user.ts",
            "lib/attestation.py",
            "src/specsheet.rs",
            "contest_data.py",
            "src/latests/x.ts",
        ] {
            assert!(!c.is_test_file(path), "{path} should not be a test file");
        }
    }

    #[test]
    fn extra_patterns_extend_builtin_set() {
        let c = TestFileClassifier::with_patterns(&["**/*_it.rs".to_string(), "[".to_string()]);
        assert!(c.is_test_file("src/db/pool_it.rs"));
        assert!(!c.is_test_file("src/db/pool.rs"));
    }
}
