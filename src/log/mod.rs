//! Marker-line classification and reading for asker/participant logs.

pub mod classify;
pub mod event;
pub mod reader;

pub use classify::LineClassifier;
pub use event::{LogEvent, STEP_COUNT};
pub use reader::{for_each_event, open_log};
