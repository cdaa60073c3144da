//! Agent output parsing
//!
//! Decodes the section format emitted by monitoring agents: one header line
//! `<<<name:opt(val)...>>>` followed by tabular data lines, one row per line.

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FormatResult};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::errors::HarnessError;

/// True iff the trimmed line is delimited like a section header.
pub fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("<<<") && trimmed.ends_with(">>>")
}

/// A decoded section header: name plus declared options.
///
/// Recognized options are `sep(<int>)` (char code of the field separator)
/// and `nostrip()` (keep surrounding whitespace on row tokens), but any
/// `key(value)` pair is accepted and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionHeader {
    pub name: String,
    pub options: HashMap<String, String>,
}

impl SectionHeader {
    /// Field separator declared via `sep(N)`. A value that does not parse as
    /// a char code falls back to whitespace splitting.
    fn separator(&self) -> Option<char> {
        self.options
            .get("sep")
            .and_then(|value| value.parse::<u32>().ok())
            .and_then(char::from_u32)
    }

    fn strips_rows(&self) -> bool {
        !self.options.contains_key("nostrip")
    }
}

impl Display for SectionHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "<<<{}", self.name)?;
        let mut keys: Vec<&String> = self.options.keys().collect();
        keys.sort();
        for key in keys {
            write!(f, ":{}({})", key, self.options[key])?;
        }
        write!(f, ">>>")
    }
}

/// One agent section materialized as the row shape check functions consume.
/// Row order matches the fixture exactly; checks are positionally sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSection {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Parses a single header line into name and options.
///
/// Fails unless the trimmed line is `<<<`-delimited; every segment after the
/// name must be a parenthesized `key(value)` pair (the value may be empty).
pub fn parse_header(line: &str) -> Result<SectionHeader, HarnessError> {
    let trimmed = line.trim();
    if !is_header(trimmed) {
        return Err(HarnessError::invalid_header(trimmed));
    }

    let option_pattern = Regex::new(r"^([^(]+)\((.*)\)$").expect("option pattern compiles");

    let inner = &trimmed[3..trimmed.len() - 3];
    let mut segments = inner.split(':');
    let name = segments.next().unwrap_or_default().to_string();

    let mut options = HashMap::new();
    for segment in segments {
        let Some(captures) = option_pattern.captures(segment) else {
            return Err(HarnessError::InvalidSectionOption {
                option: segment.to_string(),
            });
        };
        options.insert(captures[1].to_string(), captures[2].to_string());
    }

    Ok(SectionHeader { name, options })
}

/// Splits a single-section fixture into its name and tokenized rows.
///
/// The first line must be a header; a further header line anywhere in the
/// text is rejected, multi-section fixtures are not supported. A header with
/// no lines after it yields an empty row list.
pub fn parse_section(text: &str) -> Result<ParsedSection, HarnessError> {
    let mut lines = text.lines();
    let header_line = lines.next().ok_or(HarnessError::EmptyFixture)?;
    let header = parse_header(header_line)?;

    let separator = header.separator();
    let strip = header.strips_rows();

    let mut rows = Vec::new();
    for line in lines {
        if is_header(line) {
            return Err(HarnessError::UnexpectedHeader {
                line: line.trim().to_string(),
            });
        }
        let line = if strip { line.trim() } else { line };
        let tokens = match separator {
            Some(separator) => line.split(separator).map(str::to_string).collect(),
            None => line.split_whitespace().map(str::to_string).collect(),
        };
        rows.push(tokens);
    }

    debug!(section = %header.name, rows = rows.len(), "parsed agent section");

    Ok(ParsedSection {
        name: header.name,
        rows,
    })
}
