use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::backend::{AudioChunk, CaptureBackend, CaptureConfig};

/// Microphone capture through the default cpal input device
///
/// `cpal::Stream` is not `Send`, so the stream lives on a dedicated thread
/// that holds it until told to stop.
pub struct MicrophoneBackend {
    config: CaptureConfig,
    stop_tx: Option<std_mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MicrophoneBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stop_tx: None,
            thread: None,
        }
    }
}

fn run_stream(
    chunk_tx: mpsc::Sender<AudioChunk>,
    ready_tx: std_mpsc::Sender<Result<()>>,
    stop_rx: std_mpsc::Receiver<()>,
) {
    let stream = match open_stream(chunk_tx) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let _ = ready_tx.send(Ok(()));

    // Blocks until stop() sends or drops the sender.
    let _ = stop_rx.recv();
    drop(stream);
    debug!("Microphone stream dropped");
}

fn open_stream(chunk_tx: mpsc::Sender<AudioChunk>) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .context("No input device available")?;

    info!(
        "Using input device: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );

    let supported = device
        .default_input_config()
        .context("Failed to get input config")?;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();

    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels;
    let started = Instant::now();

    let err_fn = |err| error!("Audio input stream error: {}", err);

    let stream = match sample_format {
        cpal::SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                deliver(&chunk_tx, data.to_vec(), sample_rate, channels, started);
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let samples = data
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                    .collect();
                deliver(&chunk_tx, samples, sample_rate, channels, started);
            },
            err_fn,
            None,
        ),
        other => anyhow::bail!("Unsupported input sample format: {:?}", other),
    }
    .context("Failed to build input stream")?;

    stream.play().context("Failed to start input stream")?;

    Ok(stream)
}

fn deliver(
    chunk_tx: &mpsc::Sender<AudioChunk>,
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    started: Instant,
) {
    let chunk = AudioChunk {
        samples,
        sample_rate,
        channels,
        timestamp_ms: started.elapsed().as_millis() as u64,
    };

    if let Err(e) = chunk_tx.try_send(chunk) {
        warn!("Dropped microphone chunk: {}", e);
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        if self.thread.is_some() {
            anyhow::bail!("Microphone capture already running");
        }

        debug!(
            "Requesting microphone (buffer {}ms)",
            self.config.buffer_duration_ms
        );

        let (chunk_tx, chunk_rx) = mpsc::channel(1024);
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("speakup-microphone".to_string())
            .spawn(move || run_stream(chunk_tx, ready_tx, stop_rx))
            .context("Failed to spawn microphone thread")?;

        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .context("Microphone startup task panicked")?
            .context("Microphone thread exited before reporting readiness")?;

        if let Err(e) = ready {
            let _ = thread.join();
            return Err(e.context("Microphone access refused"));
        }

        self.stop_tx = Some(stop_tx);
        self.thread = Some(thread);
        info!("Microphone capture started");

        Ok(chunk_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || thread.join())
                .await
                .context("Microphone shutdown task panicked")?
                .map_err(|_| anyhow::anyhow!("Microphone thread panicked"))?;
        }

        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.thread.is_some()
    }

    fn name(&self) -> &str {
        "microphone"
    }
}
