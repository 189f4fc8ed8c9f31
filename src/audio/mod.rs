pub mod backend;
pub mod chunk;
pub mod file;

#[cfg(feature = "microphone")]
pub mod microphone;

pub use backend::{AudioChunk, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource};
pub use chunk::{ChunkBuffer, WAV_CONTENT_TYPE};
pub use file::{AudioFile, FileBackend};
