use crate::Result;
use crate::error::{AnalysisError, MarkerError};
use crate::log::{LineClassifier, LogEvent};
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a log file for line-by-line scanning.
pub fn open_log(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("open log file {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Classify every line of `reader` and hand each marker to `visit` together
/// with its 1-based line number. Noise lines are skipped; bytes that are not
/// UTF-8 are replaced, so they can only ever make a line noise.
pub fn for_each_event<R, F>(
    reader: R,
    source: &str,
    classifier: &LineClassifier,
    mut visit: F,
) -> Result<()>
where
    R: BufRead,
    F: FnMut(usize, LogEvent) -> Result<()>,
{
    for (lineno, line) in reader.split(b'\n').enumerate() {
        let lno = lineno + 1;
        let line = line.with_context(|| format!("read {}:{}", source, lno))?;
        let line = String::from_utf8_lossy(&line);

        let event = match classifier.classify(line.trim_end()) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(MarkerError::StepOutOfRange(step)) => {
                return Err(AnalysisError::StepOutOfRange {
                    source_file: source.to_string(),
                    line: lno,
                    step,
                }
                .into());
            }
            Err(error) => {
                return Err(AnalysisError::Marker {
                    source_file: source.to_string(),
                    line: lno,
                    error,
                }
                .into());
            }
        };

        visit(lno, event)?;
    }

    Ok(())
}
