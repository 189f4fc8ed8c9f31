//! Recording session state
//!
//! One `RecordingSession` exists per recording attempt. It owns:
//! - the collector task draining the capture channel into a `ChunkBuffer`
//! - the elapsed-time timer
//! - the start timestamps used for display and the upload file name

mod session;
mod timer;

pub use session::{upload_file_name, FinishedRecording, RecordingSession};
pub use timer::{format_elapsed, ElapsedTimer};
