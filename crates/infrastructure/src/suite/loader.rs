//! Loads conformance suites from YAML or JSON files.

use std::path::{Path, PathBuf};

use kvconform_domain::DomainError;
use kvconform_domain::conformance::ConformanceSuite;
use thiserror::Error;
use tracing::debug;

use crate::serialization::{SerializationError, from_json};

/// Errors raised while loading a suite file.
#[derive(Debug, Error)]
pub enum SuiteLoadError {
    /// The file could not be read.
    #[error("failed to read suite file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The extension is not one of `yaml`, `yml` or `json`.
    #[error("unsupported suite file extension: {0}")]
    UnsupportedFormat(PathBuf),

    /// YAML parse error.
    #[error("invalid YAML suite: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse error.
    #[error("invalid JSON suite: {0}")]
    Json(#[from] SerializationError),

    /// The suite parsed but is not executable.
    #[error("invalid suite: {0}")]
    Invalid(#[from] DomainError),
}

/// Suite file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl SuiteFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parses and validates a suite document.
///
/// # Errors
///
/// Returns a parse error or `SuiteLoadError::Invalid` if validation fails.
pub fn parse_suite(text: &str, format: SuiteFormat) -> Result<ConformanceSuite, SuiteLoadError> {
    let suite: ConformanceSuite = match format {
        SuiteFormat::Yaml => serde_yaml::from_str(text)?,
        SuiteFormat::Json => from_json(text)?,
    };
    suite.validate()?;
    Ok(suite)
}

/// Reads a suite file, choosing the parser by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub async fn load_suite(path: &Path) -> Result<ConformanceSuite, SuiteLoadError> {
    let format = SuiteFormat::from_path(path)
        .ok_or_else(|| SuiteLoadError::UnsupportedFormat(path.to_path_buf()))?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SuiteLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let suite = parse_suite(&text, format)?;
    debug!(path = %path.display(), cases = suite.len(), "Loaded suite");
    Ok(suite)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kvconform_domain::conformance::{
        AuthMode, CaseKind, ExpectedState, Precondition, StatusExpectation, Template,
    };
    use kvconform_domain::request::{HttpMethod, ParamEncoding};
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
name: smoke
cases:
  - name: put_missing_key
    description: "PUT: missing key"
    method: PUT
    key: "{{key}}"
    value: "{{id}}-newValue"
    expect:
      status: 400
      error: Key does not exist
      store:
        state: absent
  - name: post_percent
    tags: [bug]
    method: POST
    key: "%25"
    key_encoding: verbatim
    value: "{{value}}"
    preconditions:
      - op: delete
        key: "%25"
    expect:
      status: 200
      store:
        state: equals
        value: "{{value}}"
  - name: post_missing_parameters
    method: POST
    auth: missing
    expect:
      status: { min: 401, max: 499 }
  - name: timing
    method: POST
    key: "{{key}}"
    value: "{{value}}"
    kind:
      type: timing
      max_overhead_ms: 2000
"#;

    #[test]
    fn parses_yaml_suite() {
        let suite = parse_suite(YAML, SuiteFormat::Yaml).unwrap();
        assert_eq!(suite.name, "smoke");
        assert_eq!(suite.len(), 4);

        let put = suite.case("put_missing_key").unwrap();
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.expect.status, StatusExpectation::exact(400));
        assert_eq!(
            put.expect.store.as_ref().unwrap().state,
            ExpectedState::Absent
        );

        let percent = suite.case("post_percent").unwrap();
        assert_eq!(percent.key_encoding, ParamEncoding::Verbatim);
        assert_eq!(
            percent.preconditions,
            vec![Precondition::Delete {
                key: Template::new("%25")
            }]
        );

        let missing = suite.case("post_missing_parameters").unwrap();
        assert_eq!(missing.auth, AuthMode::Missing);
        assert_eq!(missing.expect.status, StatusExpectation::range(401, 499));

        let timing = suite.case("timing").unwrap();
        assert_eq!(timing.kind, CaseKind::Timing { max_overhead_ms: 2000 });
    }

    #[test]
    fn parses_json_suite() {
        let json = r#"{
            "name": "json",
            "cases": [
                { "name": "get", "method": "GET", "expect": { "status": [405, 501] } }
            ]
        }"#;
        let suite = parse_suite(json, SuiteFormat::Json).unwrap();
        assert_eq!(
            suite.cases[0].expect.status,
            StatusExpectation::OneOf(vec![405, 501])
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let yaml = "name: dup\ncases:\n  - { name: a, method: GET }\n  - { name: a, method: POST }\n";
        let error = parse_suite(yaml, SuiteFormat::Yaml).unwrap_err();
        assert!(matches!(
            error,
            SuiteLoadError::Invalid(DomainError::DuplicateCase(_))
        ));
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let yaml = "name: bad\ncases:\n  - { name: a, method: POST, key: \"{{nope}}\" }\n";
        assert!(matches!(
            parse_suite(yaml, SuiteFormat::Yaml),
            Err(SuiteLoadError::Invalid(DomainError::InvalidTemplate { .. }))
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SuiteFormat::from_path(Path::new("cases.YML")),
            Some(SuiteFormat::Yaml)
        );
        assert_eq!(
            SuiteFormat::from_path(Path::new("cases.json")),
            Some(SuiteFormat::Json)
        );
        assert_eq!(SuiteFormat::from_path(Path::new("cases.toml")), None);
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        tokio::fs::write(&path, YAML).await.unwrap();

        let suite = load_suite(&path).await.unwrap();
        assert_eq!(suite.len(), 4);

        let missing = load_suite(&dir.path().join("absent.yaml")).await.unwrap_err();
        assert!(matches!(missing, SuiteLoadError::Io { .. }));
    }
}
