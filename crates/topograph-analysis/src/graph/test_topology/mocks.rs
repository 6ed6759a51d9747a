//! Mock usage aggregation across all stored extractions.

use std::collections::BTreeMap;

use topograph_core::types::FxHashMap;

use crate::extraction::TestExtraction;

use super::types::{percent, HighMockTest, MockAnalysis, MockedModule};

/// Aggregate mock statistics.
///
/// Tests with `mock_ratio` strictly above `high_mock_ratio` are flagged;
/// modules are ranked by mock count, then name, keeping the first `top_modules`.
pub fn analyze_mocks(
    extractions: &BTreeMap<String, TestExtraction>,
    high_mock_ratio: f64,
    top_modules: usize,
) -> MockAnalysis {
    let mut total_mocks = 0usize;
    let mut external_mocks = 0usize;
    let mut module_counts: FxHashMap<String, usize> = FxHashMap::default();
    let mut ratio_sum = 0.0f64;
    let mut test_count = 0usize;
    let mut high_mock_ratio_tests = Vec::new();

    for extraction in extractions.values() {
        for mock in &extraction.mocks {
            total_mocks += 1;
            if mock.is_external {
                external_mocks += 1;
            }
            let module = module_of(&mock.target);
            if !module.is_empty() {
                *module_counts.entry(module.to_string()).or_default() += 1;
            }
        }

        for test in &extraction.test_cases {
            test_count += 1;
            ratio_sum += test.quality.mock_ratio;
            if test.quality.mock_ratio > high_mock_ratio {
                high_mock_ratio_tests.push(HighMockTest {
                    test_id: test.id.clone(),
                    file: extraction.file.clone(),
                    name: test.name.clone(),
                    mock_ratio: test.quality.mock_ratio,
                });
            }
        }
    }

    let mut top_mocked_modules: Vec<MockedModule> = module_counts
        .into_iter()
        .map(|(module, count)| MockedModule { module, count })
        .collect();
    top_mocked_modules.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.module.cmp(&b.module)));
    top_mocked_modules.truncate(top_modules);

    let internal_mocks = total_mocks - external_mocks;
    MockAnalysis {
        total_mocks,
        external_mocks,
        internal_mocks,
        external_percent: percent(external_mocks, total_mocks, 0),
        internal_percent: percent(internal_mocks, total_mocks, 0),
        avg_mock_ratio: if test_count > 0 {
            ratio_sum / test_count as f64
        } else {
            0.0
        },
        high_mock_ratio_tests,
        top_mocked_modules,
    }
}

/// First path segment of a mock target: `../lib/db/pool` → `lib`,
/// `axios` → `axios`, `requests.get` → `requests`.
pub fn module_of(target: &str) -> &str {
    let mut rest = target.trim();
    loop {
        if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("../") {
            rest = r;
        } else {
            break;
        }
    }
    if rest.starts_with('@') {
        // Scoped packages keep their scope: `@scope/pkg/sub` → `@scope/pkg`.
        let mut parts = rest.splitn(3, '/');
        if let (Some(scope), Some(pkg)) = (parts.next(), parts.next()) {
            return &rest[..scope.len() + 1 + pkg.len()];
        }
    }
    if rest.contains('/') {
        rest.split('/').next().unwrap_or(rest)
    } else {
        rest.split('.').next().unwrap_or(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_is_first_path_segment() {
        assert_eq!(module_of("../lib/db/pool"), "lib");
        assert_eq!(module_of("./services/user"), "services");
        assert_eq!(module_of("axios"), "axios");
        assert_eq!(module_of("requests.get"), "requests");
        assert_eq!(module_of("@aws-sdk/client-s3"), "@aws-sdk/client-s3");
        assert_eq!(module_of("@nestjs/common/decorators"), "@nestjs/common");
        assert_eq!(module_of(""), "");
    }
}
