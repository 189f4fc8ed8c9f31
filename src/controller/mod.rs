//! Recorder controller
//!
//! State machine driving one recorder:
//! - Idle → Recording on `start`
//! - Recording → Uploading → Idle on `stop`
//! - PrerequisitePending ↔ Idle via `select_book` / `submit_book`

mod controller;
mod state;

pub use controller::RecorderController;
pub use state::{BookOutcome, ControllerError, ControllerState, StopOutcome};
