use crate::error::MarkerError;
use crate::log::event::{LogEvent, STEP_COUNT};
use regex::Regex;

const BEGIN_STEP: &str = "Begin Step";

/// Recognizes the marker grammars written by the asker and participants.
///
/// ```text
/// Begin Step 3 ... 1642605876650          (may be preceded by other text)
/// End Step 3 ... 1642605877012
/// Start Cycle 0: 1642605876650
/// End ID: 1_1test0, 1642605886492
/// Waiting, id time: 4_2test17 130
/// ```
///
/// Lines that match none of these are log noise and classify to `None`.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    begin_step: Regex,
    end_step: Regex,
    start_cycle: Regex,
    end_id: Regex,
    waiting: Regex,
}

impl LineClassifier {
    pub fn new() -> anyhow::Result<Self> {
        // Step lines: the timestamp is the last whitespace-delimited token.
        Ok(Self {
            begin_step: Regex::new(r"^Begin Step ([0-9]+)\b.*\s([0-9]+)\s*$")?,
            end_step: Regex::new(r"^End Step ([0-9]+)\b.*\s([0-9]+)\s*$")?,
            start_cycle: Regex::new(r"^Start Cycle ([0-9]+): ([0-9]+)\s*$")?,
            end_id: Regex::new(r"^End ID: \S*test([0-9]+), ([0-9]+)\s*$")?,
            waiting: Regex::new(r"^Waiting, id time: \S*test([0-9]+) (-?[0-9]+)\s*$")?,
        })
    }

    pub fn classify(&self, line: &str) -> Result<Option<LogEvent>, MarkerError> {
        let line = match line.find(BEGIN_STEP) {
            Some(at) => &line[at..],
            None => line,
        };

        if let Some(caps) = self.begin_step.captures(line) {
            return Ok(Some(LogEvent::BeginStep {
                step: step_index(&caps[1])?,
                timestamp: number(&caps[2], "timestamp")?,
            }));
        }
        if let Some(caps) = self.end_step.captures(line) {
            return Ok(Some(LogEvent::EndStep {
                step: step_index(&caps[1])?,
                timestamp: number(&caps[2], "timestamp")?,
            }));
        }
        if let Some(caps) = self.start_cycle.captures(line) {
            return Ok(Some(LogEvent::StartCycle {
                cycle: number(&caps[1], "cycle")?,
                timestamp: number(&caps[2], "timestamp")?,
            }));
        }
        if let Some(caps) = self.end_id.captures(line) {
            return Ok(Some(LogEvent::EndId {
                cycle: number(&caps[1], "cycle")?,
                timestamp: number(&caps[2], "timestamp")?,
            }));
        }
        if let Some(caps) = self.waiting.captures(line) {
            return Ok(Some(LogEvent::Waiting {
                cycle: number(&caps[1], "cycle")?,
                wait: number(&caps[2], "wait time")?,
            }));
        }

        Ok(None)
    }
}

/// "3" => step index 2.
fn step_index(s: &str) -> Result<usize, MarkerError> {
    let step: u64 = number(s, "step")?;
    match usize::try_from(step) {
        Ok(n) if (1..=STEP_COUNT).contains(&n) => Ok(n - 1),
        _ => Err(MarkerError::StepOutOfRange(step)),
    }
}

fn number<T: std::str::FromStr>(s: &str, field: &'static str) -> Result<T, MarkerError> {
    s.parse().map_err(|_| MarkerError::Number {
        field,
        value: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(line: &str) -> Result<Option<LogEvent>, MarkerError> {
        LineClassifier::new().unwrap().classify(line)
    }

    #[test]
    fn begin_step_after_prefix_text() {
        assert_eq!(
            classify("[main] INFO Begin Step 1 at 100").unwrap(),
            Some(LogEvent::BeginStep {
                step: 0,
                timestamp: 100
            })
        );
    }

    #[test]
    fn end_step_uses_last_token() {
        assert_eq!(
            classify("End Step 8 for query 42: 1642605877012").unwrap(),
            Some(LogEvent::EndStep {
                step: 7,
                timestamp: 1642605877012
            })
        );
    }

    #[test]
    fn end_step_is_not_searched_mid_line() {
        assert_eq!(classify("noise End Step 1 150").unwrap(), None);
    }

    #[test]
    fn cycle_markers() {
        assert_eq!(
            classify("Start Cycle 12: 1642605876650").unwrap(),
            Some(LogEvent::StartCycle {
                cycle: 12,
                timestamp: 1642605876650
            })
        );
        assert_eq!(
            classify("End ID: 1_1test0, 1500").unwrap(),
            Some(LogEvent::EndId {
                cycle: 0,
                timestamp: 1500
            })
        );
        assert_eq!(
            classify("Waiting, id time: 4_2test17 130").unwrap(),
            Some(LogEvent::Waiting { cycle: 17, wait: 130 })
        );
    }

    #[test]
    fn noise_and_incomplete_markers_are_ignored() {
        for line in [
            "",
            "Connected to peer 3",
            "Begin Step 2",
            "begin step 2 100",
            "Start Cycle 1 1000",
            "End ID: 1_1, 1500",
            "Waiting, id time: xtest0",
            "Start Cycle ٣: 100",
            "note: Begin Step 1 took ١٠٠",
            "End ID: 1_1test٠, 1500",
        ] {
            assert_eq!(classify(line).unwrap(), None, "{line:?}");
        }
    }

    #[test]
    fn step_numbers_outside_one_to_eight_fail() {
        assert_eq!(
            classify("Begin Step 0 100"),
            Err(MarkerError::StepOutOfRange(0))
        );
        assert_eq!(
            classify("End Step 9 100"),
            Err(MarkerError::StepOutOfRange(9))
        );
    }

    #[test]
    fn oversized_timestamp_fails() {
        assert!(matches!(
            classify("Start Cycle 0: 99999999999999999999999"),
            Err(MarkerError::Number {
                field: "timestamp",
                ..
            })
        ));
    }
}
