// src/core/diagnostics.rs

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How loudly anomalies are reported.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WarningsLevel {
    /// Anomalies are corrected silently.
    Ignore,
    /// Anomalies are corrected and reported as warnings.
    Basic,
    /// The first anomaly aborts the operation.
    #[default]
    Strict,
}

/// The family an anomaly belongs to.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    File,
    ConfigStructure,
    ConfigValues,
    InputStructure,
    InputValues,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::File => "file",
            Self::ConfigStructure => "config structure",
            Self::ConfigValues => "config values",
            Self::InputStructure => "input structure",
            Self::InputValues => "input values",
        };
        f.write_str(label)
    }
}

/// An anomaly that was escalated to an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    File(String),
    #[error("{0}")]
    ConfigStructure(String),
    #[error("{0}")]
    ConfigValues(String),
    #[error("{0}")]
    InputStructure(String),
    #[error("{0}")]
    InputValues(String),
}

impl ValidationError {
    pub fn new(kind: IssueKind, message: String) -> Self {
        match kind {
            IssueKind::File => Self::File(message),
            IssueKind::ConfigStructure => Self::ConfigStructure(message),
            IssueKind::ConfigValues => Self::ConfigValues(message),
            IssueKind::InputStructure => Self::InputStructure(message),
            IssueKind::InputValues => Self::InputValues(message),
        }
    }

    pub fn kind(&self) -> IssueKind {
        match self {
            Self::File(_) => IssueKind::File,
            Self::ConfigStructure(_) => IssueKind::ConfigStructure,
            Self::ConfigValues(_) => IssueKind::ConfigValues,
            Self::InputStructure(_) => IssueKind::InputStructure,
            Self::InputValues(_) => IssueKind::InputValues,
        }
    }
}

/// An anomaly that was corrected and reported as a warning.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// The levels at which an anomaly warns and at which it raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub warn: &'static [WarningsLevel],
    pub raise: &'static [WarningsLevel],
}

impl Gate {
    /// Warns at `Basic`, raises at `Strict`.
    pub const DEFAULT: Self = Self {
        warn: &[WarningsLevel::Basic],
        raise: &[WarningsLevel::Strict],
    };

    /// Style hints: warns at `Basic` and `Strict`, never raises.
    pub const LINT: Self = Self {
        warn: &[WarningsLevel::Basic, WarningsLevel::Strict],
        raise: &[],
    };
}

/// Applies the warnings policy to every anomaly of one operation.
///
/// Emitted warnings are logged and kept, so a host can show them after the
/// operation completes.
#[derive(Debug, Clone)]
pub struct Reporter {
    level: WarningsLevel,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new(level: WarningsLevel) -> Self {
        Self {
            level,
            diagnostics: Vec::new(),
        }
    }

    pub fn level(&self) -> WarningsLevel {
        self.level
    }

    /// Reports an anomaly through the default gate.
    pub fn report(
        &mut self,
        kind: IssueKind,
        message: String,
        correction: &str,
    ) -> Result<(), ValidationError> {
        self.report_at(kind, message, correction, Gate::DEFAULT)
    }

    /// Reports an anomaly through `gate`.
    ///
    /// Returns `Err` when the current level is one the gate raises at. The
    /// correction is only appended to warnings: a raised anomaly corrects nothing.
    pub fn report_at(
        &mut self,
        kind: IssueKind,
        message: String,
        correction: &str,
        gate: Gate,
    ) -> Result<(), ValidationError> {
        if gate.raise.contains(&self.level) {
            error!("{}: {}", kind, message);
            return Err(ValidationError::new(kind, message));
        }

        if gate.warn.contains(&self.level) {
            let text = if correction.is_empty() {
                message
            } else {
                format!("{} {}", message, correction)
            };
            warn!("{}: {}", kind, text);
            self.diagnostics.push(Diagnostic { kind, message: text });
        } else {
            debug!("Suppressed {} anomaly: {}", kind, message);
        }
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the collected warnings.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_raises_with_specific_variant() {
        let mut reporter = Reporter::new(WarningsLevel::Strict);
        let result = reporter.report(IssueKind::ConfigValues, "bad".to_string(), "fixed");
        assert_eq!(result, Err(ValidationError::ConfigValues("bad".to_string())));
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_basic_collects_warnings() {
        let mut reporter = Reporter::new(WarningsLevel::Basic);
        reporter
            .report(IssueKind::File, "missing".to_string(), "Skipping.")
            .unwrap();
        assert_eq!(
            reporter.diagnostics(),
            &[Diagnostic {
                kind: IssueKind::File,
                message: "missing Skipping.".to_string()
            }]
        );
        assert_eq!(reporter.take_diagnostics().len(), 1);
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_ignore_is_silent() {
        let mut reporter = Reporter::new(WarningsLevel::Ignore);
        reporter
            .report(IssueKind::InputValues, "x".to_string(), "")
            .unwrap();
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_lint_gate_never_raises() {
        let mut reporter = Reporter::new(WarningsLevel::Strict);
        reporter
            .report_at(IssueKind::ConfigValues, "hint".to_string(), "", Gate::LINT)
            .unwrap();
        assert_eq!(reporter.diagnostics().len(), 1);
        assert_eq!(reporter.diagnostics()[0].message, "hint");
    }

    #[test]
    fn test_error_kind_round_trip() {
        let err = ValidationError::new(IssueKind::InputStructure, "eoi".to_string());
        assert_eq!(err.kind(), IssueKind::InputStructure);
        assert_eq!(err.to_string(), "eoi");
    }
}
