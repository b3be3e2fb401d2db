//! Suites of conformance cases.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ConformanceCase;
use crate::error::{DomainError, DomainResult};

/// An ordered list of cases executed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceSuite {
    /// Suite name.
    pub name: String,
    /// Cases in execution order.
    #[serde(default)]
    pub cases: Vec<ConformanceCase>,
}

impl ConformanceSuite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Adds a case (builder pattern).
    #[must_use]
    pub fn with_case(mut self, case: ConformanceCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Number of cases.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if the suite has no cases.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Looks a case up by name.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&ConformanceCase> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// Validates every case and checks names are unique.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for case in &self.cases {
            case.validate()?;
            if !seen.insert(case.name.as_str()) {
                return Err(DomainError::DuplicateCase(case.name.clone()));
            }
        }
        Ok(())
    }

    /// Returns a new suite holding only the cases the filter selects.
    #[must_use]
    pub fn filtered(&self, filter: &CaseFilter) -> Self {
        Self {
            name: self.name.clone(),
            cases: self
                .cases
                .iter()
                .filter(|c| filter.selects(c))
                .cloned()
                .collect(),
        }
    }
}

/// Case selection by tag and name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    /// When non-empty, a case must carry at least one of these tags.
    pub include_tags: Vec<String>,
    /// A case carrying any of these tags is skipped.
    pub exclude_tags: Vec<String>,
    /// Substring the case name must contain.
    pub name_contains: Option<String>,
}

impl CaseFilter {
    /// Returns true if the case passes the filter.
    #[must_use]
    pub fn selects(&self, case: &ConformanceCase) -> bool {
        if !self.include_tags.is_empty() && !self.include_tags.iter().any(|t| case.has_tag(t)) {
            return false;
        }
        if self.exclude_tags.iter().any(|t| case.has_tag(t)) {
            return false;
        }
        self.name_contains
            .as_deref()
            .is_none_or(|needle| case.name.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use pretty_assertions::assert_eq;

    fn suite() -> ConformanceSuite {
        ConformanceSuite::new("keys")
            .with_case(ConformanceCase::new("post_ok", HttpMethod::Post).with_fixture_pair())
            .with_case(
                ConformanceCase::new("post_no_token", HttpMethod::Post)
                    .with_fixture_pair()
                    .tagged("Auth"),
            )
            .with_case(
                ConformanceCase::new("get_unsupported", HttpMethod::Get)
                    .expect_status(405)
                    .tagged("bug"),
            )
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let suite = suite().with_case(ConformanceCase::new("post_ok", HttpMethod::Post));
        assert_eq!(
            suite.validate(),
            Err(DomainError::DuplicateCase("post_ok".to_string()))
        );
    }

    #[test]
    fn include_tags_match_case_insensitively() {
        let filter = CaseFilter {
            include_tags: vec!["auth".to_string()],
            ..CaseFilter::default()
        };
        let names: Vec<_> = suite()
            .filtered(&filter)
            .cases
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["post_no_token"]);
    }

    #[test]
    fn exclude_and_name_filters_combine() {
        let filter = CaseFilter {
            exclude_tags: vec!["bug".to_string()],
            name_contains: Some("post".to_string()),
            ..CaseFilter::default()
        };
        assert_eq!(suite().filtered(&filter).len(), 2);
    }

    #[test]
    fn default_filter_selects_everything() {
        assert_eq!(suite().filtered(&CaseFilter::default()).len(), 3);
    }
}
