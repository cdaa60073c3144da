use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to test code. None of these are retried or caught
/// internally; test diagnostics depend on the original condition reaching
/// the caller.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid header in test data: {line}")]
    InvalidHeader { line: String },
    #[error("invalid section option {option}")]
    InvalidSectionOption { option: String },
    #[error("test data contains a second section header: {line}")]
    UnexpectedHeader { line: String },
    #[error("test data contains no section header")]
    EmptyFixture,
    #[error("wrong section name: expected \"{expected}\", got \"{actual}\"")]
    SectionMismatch { expected: String, actual: String },
    #[error("no check named \"{name}\" is registered")]
    UnknownCheck { name: String },
    #[error("check \"{check}\" does not define {field}")]
    MissingFunction {
        check: String,
        field: &'static str,
    },
    #[error("file does not exist: {path}")]
    MissingFile { path: PathBuf },
    #[error("failed to read {path}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub fn invalid_header(line: impl Into<String>) -> Self {
        Self::InvalidHeader { line: line.into() }
    }

    pub fn section_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::SectionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_function(check: impl Into<String>, field: &'static str) -> Self {
        Self::MissingFunction {
            check: check.into(),
            field,
        }
    }
}
