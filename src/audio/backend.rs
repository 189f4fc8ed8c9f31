use anyhow::Result;
use tokio::sync::mpsc;

/// A block of captured audio (16-bit PCM, interleaved)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Offset in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for a capture backend
///
/// Sample rate and channel count come from the source itself: the device's
/// default input format or the WAV header.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Size of each delivered chunk in milliseconds
    pub buffer_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            buffer_duration_ms: 100,
        }
    }
}

/// Capture device trait
///
/// Implementations:
/// - Microphone: cpal default input device (`microphone` feature)
/// - File: replays a WAV file, for testing and headless use
///
/// `stop` closes the chunk channel. Every chunk sent before `stop` returns is
/// still delivered to the receiver before it yields `None`.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Request access to the device and start capturing
    ///
    /// Returns a channel receiver that will receive audio chunks. An error
    /// here means access was refused or no device is available.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>>;

    /// Stop capturing and release the device
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Default microphone input
    Microphone,
    /// WAV file input
    File(String),
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    /// Create a capture backend for the given source
    pub fn create(source: CaptureSource, config: CaptureConfig) -> Result<Box<dyn CaptureBackend>> {
        match source {
            CaptureSource::Microphone => {
                #[cfg(feature = "microphone")]
                {
                    use super::microphone::MicrophoneBackend;
                    Ok(Box::new(MicrophoneBackend::new(config)))
                }

                #[cfg(not(feature = "microphone"))]
                {
                    let _ = config;
                    anyhow::bail!(
                        "Microphone capture requires the `microphone` feature; use --input <wav> instead"
                    )
                }
            }

            CaptureSource::File(path) => {
                use super::file::FileBackend;
                Ok(Box::new(FileBackend::new(path, config)))
            }
        }
    }
}
