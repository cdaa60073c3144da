//! Check environment
//!
//! The explicit counterpart of the namespace a check script is executed in:
//! a registry of check metadata plus the auxiliary tables scripts populate
//! at load time. Script execution itself is an external collaborator; test
//! code fills a [`CheckEnv`] by hand or receives one from a loader and may
//! override entries before invoking the harness. The harness core treats a
//! registered [`CheckInfo`] as read-only.

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::HarnessError;
use crate::result::RawResult;

/// Transforms core-input rows into the plugin-specific parsed shape.
pub type ParseFn = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// Proposes items to monitor, given parsed section data.
pub type InventoryFn = Box<dyn Fn(&Value) -> Value + Send + Sync>;

/// Evaluates one item against parsed section data.
pub type CheckFn = Box<dyn Fn(Option<&str>, &Value, &Value) -> RawResult + Send + Sync>;

/// Metadata registered for one check, mirroring a `check_info` entry.
///
/// Section data and inventory results stay dynamic ([`Value`]) because their
/// shape is plugin-specific; only check results have a fixed protocol.
pub struct CheckInfo {
    pub service_description: String,
    pub has_perfdata: bool,
    pub inventory_function: Option<InventoryFn>,
    pub check_function: Option<CheckFn>,
    pub parse_function: Option<ParseFn>,
}

impl std::fmt::Debug for CheckInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckInfo")
            .field("service_description", &self.service_description)
            .field("has_perfdata", &self.has_perfdata)
            .field("inventory_function", &self.inventory_function.is_some())
            .field("check_function", &self.check_function.is_some())
            .field("parse_function", &self.parse_function.is_some())
            .finish()
    }
}

impl CheckInfo {
    pub fn new(service_description: impl Into<String>) -> Self {
        Self {
            service_description: service_description.into(),
            has_perfdata: false,
            inventory_function: None,
            check_function: None,
            parse_function: None,
        }
    }

    pub fn with_perfdata(mut self) -> Self {
        self.has_perfdata = true;
        self
    }

    pub fn with_inventory_function(
        mut self,
        function: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.inventory_function = Some(Box::new(function));
        self
    }

    pub fn with_check_function(
        mut self,
        function: impl Fn(Option<&str>, &Value, &Value) -> RawResult + Send + Sync + 'static,
    ) -> Self {
        self.check_function = Some(Box::new(function));
        self
    }

    pub fn with_parse_function(
        mut self,
        function: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.parse_function = Some(Box::new(function));
        self
    }
}

/// All check metadata visible to the harness.
#[derive(Debug, Default)]
pub struct CheckEnv {
    check_info: HashMap<String, CheckInfo>,
    factory_settings: HashMap<String, Value>,
    check_default_levels: HashMap<String, String>,
}

impl CheckEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a check. Replacing is how test code overrides
    /// loader-provided metadata.
    pub fn register(&mut self, name: impl Into<String>, info: CheckInfo) {
        self.check_info.insert(name.into(), info);
    }

    pub fn check_info(&self, name: &str) -> Result<&CheckInfo, HarnessError> {
        self.check_info
            .get(name)
            .ok_or_else(|| HarnessError::UnknownCheck {
                name: name.to_string(),
            })
    }

    pub fn set_factory_settings(&mut self, check: impl Into<String>, settings: Value) {
        self.factory_settings.insert(check.into(), settings);
    }

    pub fn factory_settings(&self, check: &str) -> Option<&Value> {
        self.factory_settings.get(check)
    }

    pub fn set_default_levels_variable(&mut self, check: impl Into<String>, variable: impl Into<String>) {
        self.check_default_levels.insert(check.into(), variable.into());
    }

    pub fn default_levels_variable(&self, check: &str) -> Option<&str> {
        self.check_default_levels.get(check).map(String::as_str)
    }
}
