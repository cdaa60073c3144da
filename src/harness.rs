//! Check invocation facade
//!
//! Ties the section parser, check environment and result normalizer
//! together. [`Check::inventory`] and [`Check::check`] consume raw plugin
//! text; [`Check::inventory_mk`] and [`Check::check_mk`] consume section
//! data already materialized as nested token lists, exactly as the
//! monitoring core would hand it over, respecting a declared parse function.

use serde_json::Value;
use tracing::debug;

use crate::env::{CheckEnv, CheckInfo};
use crate::errors::HarnessError;
use crate::result::CheckResult;
use crate::section::parse_section;

/// One loaded check file with its environment.
pub struct CheckFile {
    section: String,
    env: CheckEnv,
}

impl CheckFile {
    pub fn new(section: impl Into<String>, env: CheckEnv) -> Self {
        Self {
            section: section.into(),
            env,
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn env(&self) -> &CheckEnv {
        &self.env
    }

    /// Mutable access for test code that overrides loader-provided metadata.
    pub fn env_mut(&mut self) -> &mut CheckEnv {
        &mut self.env
    }

    /// Handle for one check of this file, by full name. Sub-checks use the
    /// dotted convention (`df.inodes`); the part before the dot must match
    /// this file's section.
    pub fn check(&self, name: &str) -> Result<Check<'_>, HarnessError> {
        let section = name.split('.').next().unwrap_or(name);
        if section != self.section {
            return Err(HarnessError::section_mismatch(&self.section, section));
        }

        Ok(Check {
            env: &self.env,
            name: name.to_string(),
            section: section.to_string(),
        })
    }
}

/// Invocation handle for a single named check.
#[derive(Debug)]
pub struct Check<'a> {
    env: &'a CheckEnv,
    name: String,
    section: String,
}

impl Check<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> Result<&CheckInfo, HarnessError> {
        self.env.check_info(&self.name)
    }

    pub fn service_description(&self) -> Result<&str, HarnessError> {
        Ok(&self.info()?.service_description)
    }

    pub fn has_perfdata(&self) -> Result<bool, HarnessError> {
        Ok(self.info()?.has_perfdata)
    }

    /// Applies the declared parse function to core-input data.
    pub fn parse(&self, input: Value) -> Result<Value, HarnessError> {
        let info = self.info()?;
        let parse = info
            .parse_function
            .as_ref()
            .ok_or_else(|| HarnessError::missing_function(&self.name, "parse_function"))?;
        Ok(parse(input))
    }

    /// Runs the inventory function against raw plugin output. The result is
    /// plugin-specific and returned unnormalized.
    pub fn inventory(&self, plugin_output: &str) -> Result<Value, HarnessError> {
        let rows = self.parsed_rows(plugin_output)?;
        let info = self.info()?;
        let inventory = info
            .inventory_function
            .as_ref()
            .ok_or_else(|| HarnessError::missing_function(&self.name, "inventory_function"))?;

        debug!(check = %self.name, "invoking inventory function");
        Ok(inventory(&rows))
    }

    /// Runs the check function for one item against raw plugin output and
    /// normalizes its result.
    pub fn check(
        &self,
        item: Option<&str>,
        params: &Value,
        plugin_output: &str,
    ) -> Result<CheckResult, HarnessError> {
        let rows = self.parsed_rows(plugin_output)?;
        let info = self.info()?;
        let check = info
            .check_function
            .as_ref()
            .ok_or_else(|| HarnessError::missing_function(&self.name, "check_function"))?;

        debug!(check = %self.name, item, "invoking check function");
        Ok(check(item, params, &rows).normalize())
    }

    /// Runs the inventory function against core-input data, applying the
    /// parse function first when one is declared.
    pub fn inventory_mk(&self, core_input: Value) -> Result<Value, HarnessError> {
        let info = self.info()?;
        let parsed = match info.parse_function.as_ref() {
            Some(parse) => parse(core_input),
            None => core_input,
        };
        let inventory = info
            .inventory_function
            .as_ref()
            .ok_or_else(|| HarnessError::missing_function(&self.name, "inventory_function"))?;

        debug!(check = %self.name, "invoking inventory function on core input");
        Ok(inventory(&parsed))
    }

    /// Runs the check function against core-input data, applying the parse
    /// function first when one is declared, and normalizes its result.
    pub fn check_mk(
        &self,
        item: Option<&str>,
        params: &Value,
        core_input: Value,
    ) -> Result<CheckResult, HarnessError> {
        let info = self.info()?;
        let parsed = match info.parse_function.as_ref() {
            Some(parse) => parse(core_input),
            None => core_input,
        };
        let check = info
            .check_function
            .as_ref()
            .ok_or_else(|| HarnessError::missing_function(&self.name, "check_function"))?;

        debug!(check = %self.name, item, "invoking check function on core input");
        Ok(check(item, params, &parsed).normalize())
    }

    /// Parses plugin text and verifies its section matches this check,
    /// yielding the rows as dynamic data for the plugin functions.
    fn parsed_rows(&self, plugin_output: &str) -> Result<Value, HarnessError> {
        let section = parse_section(plugin_output.trim())?;
        if section.name != self.section {
            return Err(HarnessError::section_mismatch(&self.section, section.name));
        }

        let rows = section
            .rows
            .into_iter()
            .map(|row| Value::Array(row.into_iter().map(Value::String).collect()))
            .collect();
        Ok(Value::Array(rows))
    }
}
