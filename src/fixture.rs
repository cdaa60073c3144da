//! Fixture file loading for tests that keep agent output on disk.

use std::fs;
use std::path::Path;

use crate::errors::HarnessError;

/// Reads a fixture file. A missing path is reported before any read is
/// attempted so that test failures name the file, not a parse error.
pub fn load(path: impl AsRef<Path>) -> Result<String, HarnessError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HarnessError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| HarnessError::FixtureRead {
        path: path.to_path_buf(),
        source,
    })
}
