pub mod audio;
pub mod config;
pub mod controller;
pub mod session;
pub mod upload;
pub mod view;

pub use audio::{
    AudioChunk, AudioFile, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource,
    ChunkBuffer,
};
pub use config::{CompletionMode, Config};
pub use controller::{BookOutcome, ControllerError, ControllerState, RecorderController, StopOutcome};
pub use session::{format_elapsed, RecordingSession};
pub use upload::{BookUploadResponse, HttpUploadClient, UploadResponse, UploadService};
pub use view::{ConsoleView, View};
