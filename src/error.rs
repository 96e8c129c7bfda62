//! Fatal analysis errors.
//!
//! Anything here aborts the whole run. Per-event problems that only skip or
//! overwrite a sample are `model::Diagnostic`s instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{source_file}:{line}: step {step} is outside 1..=8")]
    StepOutOfRange {
        source_file: String,
        line: usize,
        step: u64,
    },

    #[error(
        "{source_file}:{line}: cycle {cycle} is not below the configured total of {total_cycles} (is the cycle count wrong for this dataset?)"
    )]
    CycleOutOfRange {
        source_file: String,
        line: usize,
        cycle: usize,
        total_cycles: usize,
    },

    #[error("{source_file}:{line}: wait time for cycle {cycle} overflows the per-cycle total")]
    WaitOverflow {
        source_file: String,
        line: usize,
        cycle: usize,
    },

    #[error("{source_file}: asker has no {bound} timestamp for cycle {cycle}")]
    MissingCycleBound {
        source_file: String,
        cycle: usize,
        bound: CycleBound,
    },

    #[error("no participant files found in {}; cannot average wait times", .dir.display())]
    NoParticipants { dir: PathBuf },

    #[error("no asker file (steps_*) found in {}", .dir.display())]
    NoAskerFile { dir: PathBuf },

    #[error("total cycle count must be at least 1")]
    InvalidCycleCount,

    #[error("{source_file}:{line}: {error}")]
    Marker {
        source_file: String,
        line: usize,
        #[source]
        error: MarkerError,
    },
}

/// Which end of a cycle is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleBound {
    Start,
    End,
}

impl std::fmt::Display for CycleBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleBound::Start => f.write_str("start"),
            CycleBound::End => f.write_str("end"),
        }
    }
}

/// A recognized marker line carrying a number that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("step {0} is outside 1..=8")]
    StepOutOfRange(u64),

    #[error("number {value:?} in {field} does not fit")]
    Number { field: &'static str, value: String },
}
