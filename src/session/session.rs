use super::timer::ElapsedTimer;
use crate::audio::{AudioChunk, ChunkBuffer};
use crate::view::View;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// In-memory state of one recording attempt
pub struct RecordingSession {
    /// Identifier used in logs
    session_id: String,

    /// Wall-clock start time
    started_at: DateTime<Utc>,

    /// Monotonic start time for the elapsed display
    started: Instant,

    /// Drains the capture channel; yields the buffer once the channel closes
    collector: JoinHandle<ChunkBuffer>,

    /// Periodic elapsed-time display
    timer: ElapsedTimer,
}

/// Everything captured between start and stop
#[derive(Debug)]
pub struct FinishedRecording {
    pub session_id: String,
    /// Wall-clock start, source of the upload file name
    pub started_at: DateTime<Utc>,
    pub chunks: ChunkBuffer,
}

impl RecordingSession {
    /// Begin collecting chunks from a freshly started capture
    pub fn begin(
        audio_rx: mpsc::Receiver<AudioChunk>,
        view: Arc<dyn View>,
        timer_interval: Duration,
    ) -> Self {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        let started = Instant::now();

        info!("Recording session started: {}", session_id);

        let collector = tokio::spawn(collect_chunks(audio_rx));
        let timer = ElapsedTimer::spawn(started, timer_interval, view);

        Self {
            session_id,
            started_at: Utc::now(),
            started,
            collector,
            timer,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Cancel the timer and wait for every delivered chunk
    ///
    /// The capture backend must already be stopped, otherwise the collector
    /// never sees the channel close.
    pub async fn finish(self) -> Result<FinishedRecording> {
        let duration = self.started.elapsed();
        self.timer.cancel().await;

        let chunks = self
            .collector
            .await
            .context("Chunk collector task panicked")?;

        info!(
            "Recording session finished: {} ({:.1}s, {} chunks, {} samples)",
            self.session_id,
            duration.as_secs_f64(),
            chunks.len(),
            chunks.sample_count()
        );

        Ok(FinishedRecording {
            session_id: self.session_id,
            started_at: self.started_at,
            chunks,
        })
    }
}

async fn collect_chunks(mut audio_rx: mpsc::Receiver<AudioChunk>) -> ChunkBuffer {
    let mut buffer = ChunkBuffer::new();

    while let Some(chunk) = audio_rx.recv().await {
        debug!(
            "Chunk at {}ms: {} samples",
            chunk.timestamp_ms,
            chunk.samples.len()
        );
        buffer.push(chunk);
    }

    buffer
}

/// Upload file name derived from the recording's start time
pub fn upload_file_name(started_at: DateTime<Utc>) -> String {
    format!("{}_audio.wav", started_at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_is_timestamp_derived() {
        let started_at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 6).unwrap();
        assert_eq!(upload_file_name(started_at), "2024-03-09T14:05:06.000Z_audio.wav");
    }
}
