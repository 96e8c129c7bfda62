use crate::log::STEP_COUNT;
use crate::model::{CycleReport, StepReport};
use std::fmt::Write;

const NO_DATA: &str = "-";

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NO_DATA.to_string(),
    }
}

/// Per-file table (one row per file, one column per step) followed by the
/// per-step means.
pub fn render_step_tables(report: &StepReport) -> String {
    let mut out = String::new();
    let width = report
        .files
        .iter()
        .map(|f| f.source.len())
        .max()
        .unwrap_or(0)
        .max("file".len());

    out.push_str("Per file:\n");
    let _ = write!(out, "{:<width$}", "file");
    for step in 1..=STEP_COUNT {
        let _ = write!(out, " | {:>10}", format!("step {}", step));
    }
    out.push('\n');
    for file in &report.files {
        let _ = write!(out, "{:<width$}", file.source);
        for mean in file.means {
            let _ = write!(out, " | {:>10}", cell(mean));
        }
        out.push('\n');
    }

    out.push_str("\nResults:\n");
    let _ = writeln!(out, "{:>4} | {:>12} | {:>12}", "step", "mean", "contributors");
    for agg in &report.steps {
        let mean = match agg.mean {
            Some(_) => cell(agg.mean),
            None => "excluded".to_string(),
        };
        let _ = writeln!(
            out,
            "{:>4} | {:>12} | {:>12}",
            agg.step + 1,
            mean,
            agg.contributors
        );
    }

    let diagnostics: Vec<String> = report.diagnostics().map(|d| d.to_string()).collect();
    if !diagnostics.is_empty() {
        let _ = writeln!(out, "\nDiagnostics ({}):", diagnostics.len());
        for d in diagnostics {
            let _ = writeln!(out, "  {}", d);
        }
    }

    out
}

/// Side-by-side average wait and asker duration per cycle.
pub fn render_cycle_table(report: &CycleReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "participants: {}", report.participants);
    let _ = writeln!(out, "{:>5} | {:>12} | {:>12}", "cycle", "avg wait", "duration");
    for row in &report.cycles {
        let _ = writeln!(
            out,
            "{:>5} | {:>12.2} | {:>12}",
            row.cycle, row.avg_wait, row.duration
        );
    }
    out
}
