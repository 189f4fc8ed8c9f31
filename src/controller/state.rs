use std::fmt;
use thiserror::Error;

use crate::upload::{BookUploadResponse, UploadResponse};

/// Recorder controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    /// Waiting for a book upload (book variant only)
    PrerequisitePending,
    Recording,
    Uploading,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PrerequisitePending => "waiting for a book",
            Self::Recording => "recording",
            Self::Uploading => "uploading",
        };
        f.write_str(name)
    }
}

/// User actions the controller refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("a book must be uploaded before recording")]
    PrerequisiteMissing,

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: ControllerState,
        action: &'static str,
    },

    #[error("capture device unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("no book selected")]
    NoBookSelected,

    #[error("book uploads are not enabled for this recorder")]
    BookUploadUnsupported,
}

/// Result of a stop action
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// Nothing was recording
    NotRecording,
    /// Upload accepted, view reloaded
    Reloaded,
    /// Upload accepted, response shown
    Answered(UploadResponse),
    /// Upload or assembly failed; the audio is discarded
    Failed(String),
}

/// Result of a book submission
#[derive(Debug, Clone, PartialEq)]
pub enum BookOutcome {
    Accepted(BookUploadResponse),
    Failed(String),
}
