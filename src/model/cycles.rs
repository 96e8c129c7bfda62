//! Cycle-keyed measurements: participant wait totals and asker cycle durations.

use crate::Result;
use crate::error::{AnalysisError, CycleBound};
use crate::log::{LineClassifier, LogEvent, for_each_event};
use std::io::BufRead;

fn check_cycle(
    source: &str,
    line: usize,
    cycle: usize,
    total_cycles: usize,
) -> std::result::Result<(), AnalysisError> {
    if cycle >= total_cycles {
        return Err(AnalysisError::CycleOutOfRange {
            source_file: source.to_string(),
            line,
            cycle,
            total_cycles,
        });
    }
    Ok(())
}

/// Sums one participant's `Waiting` values per cycle.
#[derive(Debug)]
pub struct CycleWaitAccumulator {
    source: String,
    totals: Vec<i64>,
}

impl CycleWaitAccumulator {
    pub fn new(source: impl Into<String>, total_cycles: usize) -> Self {
        Self {
            source: source.into(),
            totals: vec![0; total_cycles],
        }
    }

    /// Only `Waiting` events count; a cycle past the configured total is fatal.
    pub fn observe(&mut self, line: usize, event: LogEvent) -> Result<()> {
        if let LogEvent::Waiting { cycle, wait } = event {
            check_cycle(&self.source, line, cycle, self.totals.len())?;
            self.totals[cycle] =
                self.totals[cycle]
                    .checked_add(wait)
                    .ok_or_else(|| AnalysisError::WaitOverflow {
                        source_file: self.source.clone(),
                        line,
                        cycle,
                    })?;
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<i64> {
        self.totals
    }
}

/// Per-cycle wait time summed across participants, averaged on demand.
#[derive(Debug, Clone)]
pub struct WaitTotals {
    totals: Vec<i128>,
    participants: usize,
}

impl WaitTotals {
    pub fn new(total_cycles: usize) -> Self {
        Self {
            totals: vec![0; total_cycles],
            participants: 0,
        }
    }

    pub fn add_participant(&mut self, waits: &[i64]) {
        for (total, wait) in self.totals.iter_mut().zip(waits) {
            *total += i128::from(*wait);
        }
        self.participants += 1;
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Per-cycle mean over participants, or `None` when there were none.
    pub fn averages(&self) -> Option<Vec<f64>> {
        if self.participants == 0 {
            return None;
        }
        let n = self.participants as f64;
        Some(self.totals.iter().map(|&t| t as f64 / n).collect())
    }
}

/// Pairs the asker's `Start Cycle` and `End ID` markers by cycle index.
#[derive(Debug)]
pub struct CycleDurationExtractor {
    source: String,
    start: Vec<Option<i64>>,
    end: Vec<Option<i64>>,
}

impl CycleDurationExtractor {
    pub fn new(source: impl Into<String>, total_cycles: usize) -> Self {
        Self {
            source: source.into(),
            start: vec![None; total_cycles],
            end: vec![None; total_cycles],
        }
    }

    pub fn observe(&mut self, line: usize, event: LogEvent) -> Result<()> {
        let (slots, cycle, timestamp) = match event {
            LogEvent::StartCycle { cycle, timestamp } => (&mut self.start, cycle, timestamp),
            LogEvent::EndId { cycle, timestamp } => (&mut self.end, cycle, timestamp),
            _ => return Ok(()),
        };
        check_cycle(&self.source, line, cycle, slots.len())?;
        slots[cycle] = Some(timestamp);
        Ok(())
    }

    /// `end - start` for every cycle; any cycle lacking a positive start or
    /// end aborts with that cycle named.
    pub fn finish(self) -> Result<Vec<i64>> {
        let mut durations = Vec::with_capacity(self.start.len());
        for (cycle, (start, end)) in self.start.iter().zip(&self.end).enumerate() {
            let missing = |bound| AnalysisError::MissingCycleBound {
                source_file: self.source.clone(),
                cycle,
                bound,
            };
            let start = start
                .filter(|&t| t > 0)
                .ok_or_else(|| missing(CycleBound::Start))?;
            let end = end.filter(|&t| t > 0).ok_or_else(|| missing(CycleBound::End))?;
            durations.push(end - start);
        }
        Ok(durations)
    }
}

/// Wait totals for one participant file.
pub fn waits_from_reader<R: BufRead>(
    reader: R,
    source: &str,
    total_cycles: usize,
    classifier: &LineClassifier,
) -> Result<Vec<i64>> {
    let mut acc = CycleWaitAccumulator::new(source, total_cycles);
    for_each_event(reader, source, classifier, |lno, event| acc.observe(lno, event))?;
    Ok(acc.finish())
}

/// Cycle durations from the asker file.
pub fn durations_from_reader<R: BufRead>(
    reader: R,
    source: &str,
    total_cycles: usize,
    classifier: &LineClassifier,
) -> Result<Vec<i64>> {
    let mut extractor = CycleDurationExtractor::new(source, total_cycles);
    for_each_event(reader, source, classifier, |lno, event| {
        extractor.observe(lno, event)
    })?;
    extractor.finish()
}
