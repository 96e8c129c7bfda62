//! Recoverable, per-event problems found while pairing markers.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub source: String,
    pub line: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

/// Step indices are zero-based, as everywhere else in the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `End Step` with no open `Begin Step`; no sample recorded.
    EndWithoutBegin { step: usize },
    /// `Begin Step` while the step was already open; the newer begin wins.
    BeginWhileOpen { step: usize, replaced: i64 },
    /// Paired interval with end before begin; the sample is kept.
    NegativeDuration { step: usize, duration: i64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: ", self.source, self.line)?;
        match self.kind {
            DiagnosticKind::EndWithoutBegin { step } => {
                write!(f, "end of step {} without a matching begin", step + 1)
            }
            DiagnosticKind::BeginWhileOpen { step, replaced } => write!(
                f,
                "begin of step {} while still open since {}; using the later begin",
                step + 1,
                replaced
            ),
            DiagnosticKind::NegativeDuration { step, duration } => {
                write!(f, "step {} has negative duration {}", step + 1, duration)
            }
        }
    }
}
