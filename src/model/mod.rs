//! Aggregation model: per-file results combined into cross-participant means.
//!
//! Every file is opened, scanned and closed before the next one, and nothing
//! survives between runs except what the returned report holds.

pub mod cycles;
pub mod diagnostic;
pub mod steps;

pub use cycles::WaitTotals;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use steps::{StepFileResult, StepMeans};

use crate::Result;
use crate::dataset::{CycleDataset, StepDataset};
use crate::error::AnalysisError;
use crate::log::{LineClassifier, STEP_COUNT, open_log};
use serde::Serialize;
use std::path::Path;

/// Cross-file mean for one step. `mean` is `None` when no file completed
/// the step (`contributors == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepAggregate {
    pub step: usize,
    pub mean: Option<f64>,
    pub contributors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Asker first, then participants in name order.
    pub files: Vec<StepFileResult>,
    pub steps: Vec<StepAggregate>,
}

impl StepReport {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|f| f.diagnostics.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleRow {
    pub cycle: usize,
    pub avg_wait: f64,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub participants: usize,
    pub cycles: Vec<CycleRow>,
}

/// Mean over the files that have data at each step.
pub fn aggregate_steps(files: &[StepMeans]) -> Vec<StepAggregate> {
    (0..STEP_COUNT)
        .map(|step| {
            let values: Vec<f64> = files.iter().filter_map(|means| means[step]).collect();
            let contributors = values.len();
            let mean = (contributors > 0).then(|| values.iter().sum::<f64>() / contributors as f64);
            StepAggregate {
                step,
                mean,
                contributors,
            }
        })
        .collect()
}

fn label(path: &Path) -> String {
    path.display().to_string()
}

/// Step-aggregation mode: the asker and every participant contribute one
/// 8-slot result each.
pub fn run_steps(dataset: &StepDataset, classifier: &LineClassifier) -> Result<StepReport> {
    let mut files = Vec::with_capacity(dataset.participants.len() + 1);

    for path in std::iter::once(&dataset.asker).chain(&dataset.participants) {
        let source = label(path);
        let result = steps::steps_from_reader(open_log(path)?, &source, classifier)?;
        tracing::info!("{}: step means {:?}", source, result.means);
        files.push(result);
    }

    let means: Vec<StepMeans> = files.iter().map(|f| f.means).collect();
    let steps = aggregate_steps(&means);
    for agg in &steps {
        if agg.contributors == 0 {
            tracing::info!("step {} has no data in any file", agg.step + 1);
        }
    }

    Ok(StepReport { files, steps })
}

/// Cycle-aggregation mode: average participant wait per cycle next to the
/// asker's total duration for that cycle.
pub fn run_cycles(dataset: &CycleDataset, classifier: &LineClassifier) -> Result<CycleReport> {
    let total_cycles = dataset.total_cycles;
    let mut totals = WaitTotals::new(total_cycles);

    for path in &dataset.participants {
        let source = label(path);
        let waits = cycles::waits_from_reader(open_log(path)?, &source, total_cycles, classifier)?;
        tracing::debug!("{}: waits {:?}", source, waits);
        totals.add_participant(&waits);
    }

    let avg_waits = totals.averages().ok_or_else(|| AnalysisError::NoParticipants {
        dir: dataset.peer_dir.clone(),
    })?;
    tracing::info!(
        "average wait over {} participants: {:?}",
        totals.participants(),
        avg_waits
    );

    let asker = label(&dataset.asker);
    let durations =
        cycles::durations_from_reader(open_log(&dataset.asker)?, &asker, total_cycles, classifier)?;
    tracing::info!("{}: cycle durations {:?}", asker, durations);

    let cycles = avg_waits
        .into_iter()
        .zip(durations)
        .enumerate()
        .map(|(cycle, (avg_wait, duration))| CycleRow {
            cycle,
            avg_wait,
            duration,
        })
        .collect();

    Ok(CycleReport {
        participants: totals.participants(),
        cycles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn aggregate_skips_files_without_data() {
        let mut a: StepMeans = [None; STEP_COUNT];
        let mut b: StepMeans = [None; STEP_COUNT];
        let asker: StepMeans = [None; STEP_COUNT];
        a[0] = Some(50.0);
        b[0] = Some(70.0);
        b[3] = Some(0.0);

        let aggs = aggregate_steps(&[asker, a, b]);
        assert_eq!(
            aggs[0],
            StepAggregate {
                step: 0,
                mean: Some(60.0),
                contributors: 2
            }
        );
        assert_eq!(aggs[3].mean, Some(0.0));
        assert_eq!(aggs[3].contributors, 1);
        assert_eq!(
            aggs[1],
            StepAggregate {
                step: 1,
                mean: None,
                contributors: 0
            }
        );
    }

    #[test]
    fn steps_pipeline_over_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write(
            dir,
            "steps_1",
            "Begin Step 2 0\nEnd Step 2 40\nEnd Step 3 10\n",
        );
        write(dir, "a", "Begin Step 1 ... 100\nx\nEnd Step 1 ... 150\n");
        write(dir, "b", "[t] Begin Step 1 200\nEnd Step 1 270\n");

        let ds = StepDataset::discover(dir).unwrap();
        let classifier = LineClassifier::new().unwrap();
        let report = run_steps(&ds, &classifier).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.files[0].source, label(&dir.join("steps_1")));
        assert_eq!(report.steps[0].mean, Some(60.0));
        assert_eq!(report.steps[0].contributors, 2);
        assert_eq!(report.steps[1].mean, Some(40.0));
        assert_eq!(report.steps[1].contributors, 1);
        assert_eq!(report.steps[2].mean, None);
        assert_eq!(report.diagnostics().count(), 1);

        // Nothing carries over between runs.
        let again = run_steps(&ds, &classifier).unwrap();
        assert_eq!(again, report);
    }

    #[test]
    fn cycles_pipeline_over_directories() {
        let data = tempfile::tempdir().unwrap();
        let peers = tempfile::tempdir().unwrap();
        write(
            data.path(),
            "run_4_1.txt",
            "Start Cycle 0: 1000\n\
             Start Cycle 1: 2000\n\
             End ID: 1_1test0, 1500\n\
             End ID: 1_1test1, 2900\n",
        );
        write(
            peers.path(),
            "1",
            "Waiting, id time: 4_1test0 30\nWaiting, id time: 4_1test0 30\n",
        );
        write(peers.path(), "2", "Waiting, id time: 4_1test1 8\n");

        let ds = CycleDataset::discover(data.path(), peers.path(), "run_4_1.txt", 2).unwrap();
        let report = run_cycles(&ds, &LineClassifier::new().unwrap()).unwrap();

        assert_eq!(
            report,
            CycleReport {
                participants: 2,
                cycles: vec![
                    CycleRow {
                        cycle: 0,
                        avg_wait: 30.0,
                        duration: 500
                    },
                    CycleRow {
                        cycle: 1,
                        avg_wait: 4.0,
                        duration: 900
                    },
                ],
            }
        );
    }

    #[test]
    fn cycles_pipeline_without_participants_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "run", "Start Cycle 0: 1\nEnd ID: xtest0, 2\n");
        let ds = CycleDataset::discover(tmp.path(), tmp.path(), "run", 1).unwrap();

        let err = run_cycles(&ds, &LineClassifier::new().unwrap()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::NoParticipants { .. })
        ));
    }
}
