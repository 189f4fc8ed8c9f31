// Integration tests for assembling captured chunks into one WAV payload
//
// These tests verify that chunk order, format, and sample data survive
// packaging into the uploaded recording.

use anyhow::Result;
use speakup::audio::{AudioChunk, ChunkBuffer};
use std::io::Cursor;

fn chunk(samples: Vec<i16>, sample_rate: u32, channels: u16, timestamp_ms: u64) -> AudioChunk {
    AudioChunk {
        samples,
        sample_rate,
        channels,
        timestamp_ms,
    }
}

#[test]
fn test_assembly_preserves_arrival_order() -> Result<()> {
    let mut buffer = ChunkBuffer::new();
    buffer.push(chunk(vec![3, 3, 3], 16000, 1, 0));
    buffer.push(chunk(vec![1], 16000, 1, 100));
    buffer.push(chunk(vec![2, 2], 16000, 1, 200));

    let wav = buffer.assemble_wav(16000, 1)?;
    let samples: Vec<i16> = hound::WavReader::new(Cursor::new(wav))?
        .into_samples::<i16>()
        .collect::<Result<_, _>>()?;

    assert_eq!(samples, vec![3, 3, 3, 1, 2, 2]);

    Ok(())
}

#[test]
fn test_assembly_uses_captured_format() -> Result<()> {
    let mut buffer = ChunkBuffer::new();
    // 100ms of 48kHz stereo
    buffer.push(chunk(vec![0; 9600], 48000, 2, 0));

    let wav = buffer.assemble_wav(16000, 1)?;
    let reader = hound::WavReader::new(Cursor::new(wav))?;
    let spec = reader.spec();

    assert_eq!(spec.sample_rate, 48000, "First chunk decides the format");
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.duration(), 4800, "4800 frames per channel");

    Ok(())
}

#[test]
fn test_assembly_of_empty_recording_uses_fallback() -> Result<()> {
    let buffer = ChunkBuffer::new();

    let wav = buffer.assemble_wav(22050, 2)?;
    let reader = hound::WavReader::new(Cursor::new(wav))?;

    assert_eq!(reader.spec().sample_rate, 22050);
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.len(), 0);

    Ok(())
}

#[test]
fn test_payload_is_riff_wave() -> Result<()> {
    let mut buffer = ChunkBuffer::new();
    buffer.push(chunk(vec![i16::MIN, 0, i16::MAX], 16000, 1, 0));

    let wav = buffer.assemble_wav(16000, 1)?;

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");

    let reader = hound::WavReader::new(Cursor::new(wav))?;
    assert_eq!(reader.len(), 3);

    Ok(())
}
