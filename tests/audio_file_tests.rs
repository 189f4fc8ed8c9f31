// Integration tests for WAV file capture
//
// These tests write a WAV fixture to a temp dir, then read it back through
// AudioFile and replay it through the file capture backend.

use anyhow::Result;
use speakup::audio::{AudioFile, CaptureBackend, CaptureConfig, FileBackend};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_fixture(dir: &Path, samples: &[i16], sample_rate: u32, channels: u16) -> Result<PathBuf> {
    let path = dir.join("fixture.wav");
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;

    Ok(path)
}

#[test]
fn test_audio_file_open() -> Result<()> {
    let dir = TempDir::new()?;
    let samples: Vec<i16> = (0..8000).map(|i| (i % 100) as i16).collect();
    let path = write_fixture(dir.path(), &samples, 16000, 1)?;

    let audio = AudioFile::open(&path)?;

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples, samples);
    assert!((audio.duration_seconds - 0.5).abs() < 0.001, "8000 samples at 16kHz is 0.5s");
    assert!(audio.path.contains("fixture.wav"));

    Ok(())
}

#[test]
fn test_audio_file_nonexistent() {
    let result = AudioFile::open("/nonexistent/path/to/audio.wav");

    assert!(result.is_err(), "Opening nonexistent file should fail");
}

#[test]
fn test_audio_file_chunks_keep_order_and_frames() -> Result<()> {
    let dir = TempDir::new()?;
    // Stereo, 1000 frames at 8kHz
    let samples: Vec<i16> = (0..2000).map(|i| i as i16).collect();
    let path = write_fixture(dir.path(), &samples, 8000, 2)?;

    let audio = AudioFile::open(&path)?;
    let chunks = audio.chunks(50); // 400 frames = 800 samples per chunk

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].samples.len(), 800);
    assert_eq!(chunks[2].samples.len(), 400);
    assert_eq!(chunks[1].timestamp_ms, 50);

    let rejoined: Vec<i16> = chunks.into_iter().flat_map(|c| c.samples).collect();
    assert_eq!(rejoined, samples);

    Ok(())
}

#[tokio::test]
async fn test_file_backend_replays_whole_file() -> Result<()> {
    let dir = TempDir::new()?;
    let samples: Vec<i16> = (0..1600).map(|i| i as i16).collect();
    let path = write_fixture(dir.path(), &samples, 16000, 1)?;

    let config = CaptureConfig {
        buffer_duration_ms: 10,
    };
    let mut backend = FileBackend::new(path.to_string_lossy(), config);

    let mut rx = backend.start().await?;
    assert!(backend.is_capturing());

    let mut received = Vec::new();
    while let Some(chunk) = rx.recv().await {
        received.extend(chunk.samples);
    }

    backend.stop().await?;
    assert!(!backend.is_capturing());
    assert_eq!(received, samples);

    Ok(())
}

#[tokio::test]
async fn test_file_backend_missing_file_refuses_start() {
    let mut backend = FileBackend::new("/nonexistent/input.wav", CaptureConfig::default());

    assert!(backend.start().await.is_err());
    assert!(!backend.is_capturing());
}
