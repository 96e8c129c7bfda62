/// Number of fixed steps in a test run. Source text numbers them 1..=8.
pub const STEP_COUNT: usize = 8;

/// One classified marker line.
///
/// Step indices are zero-based (`Begin Step 1` is step 0). Cycle indices are
/// taken verbatim from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent {
    BeginStep { step: usize, timestamp: i64 },
    EndStep { step: usize, timestamp: i64 },
    StartCycle { cycle: usize, timestamp: i64 },
    EndId { cycle: usize, timestamp: i64 },
    Waiting { cycle: usize, wait: i64 },
}

