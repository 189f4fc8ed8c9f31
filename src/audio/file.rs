use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::backend::{AudioChunk, CaptureBackend, CaptureConfig};

pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

        let spec = reader.spec();
        if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
            anyhow::bail!(
                "Unsupported WAV format: {}-bit {:?} (expected 16-bit PCM)",
                spec.bits_per_sample,
                spec.sample_format
            );
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds = samples.len() as f64 /
            (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Split the file into chunks of `buffer_duration_ms`
    pub fn chunks(&self, buffer_duration_ms: u64) -> Vec<AudioChunk> {
        let frames_per_chunk =
            ((self.sample_rate as u64 * buffer_duration_ms) / 1000).max(1) as usize;
        let samples_per_chunk = frames_per_chunk * self.channels as usize;

        self.samples
            .chunks(samples_per_chunk)
            .enumerate()
            .map(|(i, samples)| AudioChunk {
                samples: samples.to_vec(),
                sample_rate: self.sample_rate,
                channels: self.channels,
                timestamp_ms: i as u64 * buffer_duration_ms,
            })
            .collect()
    }
}

/// Capture backend that replays a WAV file at real-time pace
pub struct FileBackend {
    path: String,
    config: CaptureConfig,
    is_capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl FileBackend {
    pub fn new(path: impl Into<String>, config: CaptureConfig) -> Self {
        Self {
            path: path.into(),
            config,
            is_capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        if self.is_capturing.load(Ordering::SeqCst) {
            anyhow::bail!("File capture already running: {}", self.path);
        }

        let audio = AudioFile::open(&self.path)?;
        let chunks = audio.chunks(self.config.buffer_duration_ms);
        let pace = Duration::from_millis(self.config.buffer_duration_ms);

        let (tx, rx) = mpsc::channel(100);
        let is_capturing = Arc::clone(&self.is_capturing);
        is_capturing.store(true, Ordering::SeqCst);

        let task = tokio::spawn(async move {
            for chunk in chunks {
                if !is_capturing.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(e) = tx.send(chunk).await {
                    error!("Failed to deliver file chunk: {}", e);
                    break;
                }
                tokio::time::sleep(pace).await;
            }
            info!("File replay finished");
        });

        self.task = Some(task);
        info!("File capture started: {}", self.path);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.is_capturing.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            task.await.context("File replay task panicked")?;
        }

        info!("File capture stopped: {}", self.path);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
