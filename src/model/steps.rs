//! Pairing of `Begin Step` / `End Step` markers within one file.

use crate::Result;
use crate::log::{LineClassifier, LogEvent, STEP_COUNT, for_each_event};
use crate::model::{Diagnostic, DiagnosticKind};
use serde::Serialize;
use std::io::BufRead;

/// Per-step mean for one file; `None` means the step was never completed.
pub type StepMeans = [Option<f64>; STEP_COUNT];

/// Tracks one open interval per step and collects closed-interval durations.
///
/// A second `Begin Step` for an already open step replaces the earlier begin
/// (latest-begin-wins) and is reported as a diagnostic.
#[derive(Debug)]
pub struct StepIntervalTracker {
    source: String,
    open: [Option<i64>; STEP_COUNT],
    samples: [Vec<i64>; STEP_COUNT],
    diagnostics: Vec<Diagnostic>,
}

/// Everything learned about one file in step mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFileResult {
    pub source: String,
    pub means: StepMeans,
    pub sample_counts: [usize; STEP_COUNT],
    pub diagnostics: Vec<Diagnostic>,
}

impl StepIntervalTracker {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            open: [None; STEP_COUNT],
            samples: Default::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Feed one event. Cycle events are not step markers and are ignored.
    pub fn observe(&mut self, line: usize, event: LogEvent) {
        match event {
            LogEvent::BeginStep { step, timestamp } => {
                if let Some(replaced) = self.open[step].replace(timestamp) {
                    self.report(line, DiagnosticKind::BeginWhileOpen { step, replaced });
                }
            }
            LogEvent::EndStep { step, timestamp } => match self.open[step].take() {
                Some(start) => {
                    let duration = timestamp - start;
                    if duration < 0 {
                        self.report(line, DiagnosticKind::NegativeDuration { step, duration });
                    }
                    self.samples[step].push(duration);
                }
                None => self.report(line, DiagnosticKind::EndWithoutBegin { step }),
            },
            _ => {}
        }
    }

    fn report(&mut self, line: usize, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            source: self.source.clone(),
            line,
            kind,
        };
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Average each step's samples. Still-open intervals are dropped.
    pub fn finish(self) -> StepFileResult {
        for (step, open) in self.open.iter().enumerate() {
            if let Some(start) = open {
                tracing::debug!(
                    "{}: step {} begun at {} never ended",
                    self.source,
                    step + 1,
                    start
                );
            }
        }

        StepFileResult {
            means: self.samples.each_ref().map(|s| mean(s)),
            sample_counts: self.samples.each_ref().map(Vec::len),
            source: self.source,
            diagnostics: self.diagnostics,
        }
    }
}

fn mean(samples: &[i64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total: i128 = samples.iter().map(|&s| i128::from(s)).sum();
    Some(total as f64 / samples.len() as f64)
}

/// Run a tracker over a whole reader.
pub fn steps_from_reader<R: BufRead>(
    reader: R,
    source: &str,
    classifier: &LineClassifier,
) -> Result<StepFileResult> {
    let mut tracker = StepIntervalTracker::new(source);
    for_each_event(reader, source, classifier, |lno, event| {
        tracker.observe(lno, event);
        Ok(())
    })?;
    Ok(tracker.finish())
}
