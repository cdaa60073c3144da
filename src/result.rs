//! Check result shapes and normalization
//!
//! Check functions return either a single (status, text, perfdata) record or
//! a list of sub-results. Test code only ever sees the canonical
//! [`CheckResult`] produced by [`RawResult::normalize`].

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::Serialize;

/// Monitoring state of a service. 0 is OK, 1 WARN, 2 CRIT, 3 UNKNOWN;
/// larger values are accepted and treated as worse than WARN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Status(pub u8);

impl Status {
    pub const OK: Status = Status(0);
    pub const WARN: Status = Status(1);
    pub const CRIT: Status = Status(2);
    pub const UNKNOWN: Status = Status(3);

    /// Marker appended to a sub-result's text when several sub-results are
    /// folded into one service output. Values above UNKNOWN clamp to `(?)`.
    fn marker(self) -> &'static str {
        match self.0 {
            0 => "",
            1 => "(!)",
            2 => "(!!)",
            _ => "(?)",
        }
    }

    /// Folds another status into this one. CRIT is absorbing: once either
    /// side is CRIT the aggregate stays CRIT, even past later UNKNOWNs.
    fn combine(self, other: Status) -> Status {
        if self == Self::CRIT || other == Self::CRIT {
            Self::CRIT
        } else {
            Status(self.0.max(other.0))
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match *self {
            Self::OK => write!(f, "OK"),
            Self::WARN => write!(f, "WARN"),
            Self::CRIT => write!(f, "CRIT"),
            Self::UNKNOWN => write!(f, "UNKNOWN"),
            Status(other) => write!(f, "UNKNOWN({other})"),
        }
    }
}

/// One performance data entry attached to a check result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: f64,
    pub warn: Option<f64>,
    pub crit: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    pub fn with_levels(mut self, warn: f64, crit: f64) -> Self {
        self.warn = Some(warn);
        self.crit = Some(crit);
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

impl Display for Metric {
    /// Renders the `label=value;warn;crit;min;max` perfdata field, with
    /// trailing empty fields omitted.
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "{}={}", self.label, self.value)?;
        let fields = [self.warn, self.crit, self.min, self.max];
        let last = fields.iter().rposition(Option::is_some);
        for field in &fields[..last.map_or(0, |index| index + 1)] {
            match field {
                Some(value) => write!(f, ";{value}")?,
                None => write!(f, ";")?,
            }
        }
        Ok(())
    }
}

/// One entry of a check function's result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubResult {
    pub status: Status,
    pub text: Option<String>,
    pub perfdata: Vec<Metric>,
}

impl SubResult {
    pub fn new(status: Status, text: impl Into<String>) -> Self {
        Self {
            status,
            text: Some(text.into()),
            perfdata: Vec::new(),
        }
    }

    /// A sub-result that contributes status and perfdata but no output text.
    pub fn silent(status: Status) -> Self {
        Self {
            status,
            text: None,
            perfdata: Vec::new(),
        }
    }

    pub fn with_perfdata(mut self, perfdata: Vec<Metric>) -> Self {
        self.perfdata = perfdata;
        self
    }
}

/// The raw return shape of a check function, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawResult {
    /// The legacy fixed-record protocol: one (status, text, perfdata) value.
    Single(SubResult),
    /// A list of sub-results to be folded into one service output.
    Multi(Vec<SubResult>),
}

impl From<SubResult> for RawResult {
    fn from(sub: SubResult) -> Self {
        Self::Single(sub)
    }
}

impl From<Vec<SubResult>> for RawResult {
    fn from(subs: Vec<SubResult>) -> Self {
        Self::Multi(subs)
    }
}

impl RawResult {
    /// Folds the raw value into the canonical (status, summary, perfdata)
    /// triple.
    ///
    /// A `Single` record and a one-element `Multi` list pass through
    /// unchanged. Longer lists aggregate: texts get their status marker
    /// appended and are joined with `", "`, perfdata is concatenated in
    /// sub-result order, and the status folds with CRIT absorbing.
    pub fn normalize(self) -> CheckResult {
        match self {
            Self::Single(sub) => CheckResult::from(sub),
            Self::Multi(mut subs) if subs.len() == 1 => CheckResult::from(subs.remove(0)),
            Self::Multi(subs) => {
                let mut status = Status::OK;
                let mut texts = Vec::new();
                let mut perfdata = Vec::new();

                for sub in subs {
                    if let Some(text) = sub.text {
                        texts.push(format!("{}{}", text, sub.status.marker()));
                    }
                    status = status.combine(sub.status);
                    perfdata.extend(sub.perfdata);
                }

                CheckResult {
                    status,
                    summary: texts.join(", "),
                    perfdata,
                }
            }
        }
    }
}

/// The canonical result handed back to test code. Created fresh per
/// invocation; nothing is shared across calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub status: Status,
    pub summary: String,
    pub perfdata: Vec<Metric>,
}

impl From<SubResult> for CheckResult {
    fn from(sub: SubResult) -> Self {
        Self {
            status: sub.status,
            summary: sub.text.unwrap_or_default(),
            perfdata: sub.perfdata,
        }
    }
}
