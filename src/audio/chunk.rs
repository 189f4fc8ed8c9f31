use anyhow::{Context, Result};
use std::io::Cursor;

use super::backend::AudioChunk;

/// Content type of an assembled recording
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Ordered buffer of the chunks captured during one recording
#[derive(Debug, Default, Clone)]
pub struct ChunkBuffer {
    chunks: Vec<AudioChunk>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk in arrival order
    pub fn push(&mut self, chunk: AudioChunk) {
        self.chunks.push(chunk);
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[AudioChunk] {
        &self.chunks
    }

    /// Total number of interleaved samples across all chunks
    pub fn sample_count(&self) -> usize {
        self.chunks.iter().map(|c| c.samples.len()).sum()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Assemble all chunks into one WAV payload
    ///
    /// The format comes from the first chunk; `fallback_rate` and
    /// `fallback_channels` are used when nothing was captured.
    pub fn assemble_wav(&self, fallback_rate: u32, fallback_channels: u16) -> Result<Vec<u8>> {
        let (sample_rate, channels) = self
            .chunks
            .first()
            .map(|c| (c.sample_rate, c.channels))
            .unwrap_or((fallback_rate, fallback_channels));

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer =
                hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;

            for chunk in &self.chunks {
                if chunk.sample_rate != sample_rate || chunk.channels != channels {
                    anyhow::bail!(
                        "Chunk format changed mid-recording: {}Hz {}ch, expected {}Hz {}ch",
                        chunk.sample_rate,
                        chunk.channels,
                        sample_rate,
                        channels
                    );
                }
                for &sample in &chunk.samples {
                    writer
                        .write_sample(sample)
                        .context("Failed to write sample to WAV")?;
                }
            }

            writer.finalize().context("Failed to finalize WAV payload")?;
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(samples: Vec<i16>, timestamp_ms: u64) -> AudioChunk {
        AudioChunk {
            samples,
            sample_rate: 16000,
            channels: 1,
            timestamp_ms,
        }
    }

    #[test]
    fn empty_buffer_assembles_header_only() {
        let buffer = ChunkBuffer::new();
        let wav = buffer.assemble_wav(16000, 1).unwrap();

        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn mixed_formats_are_rejected() {
        let mut buffer = ChunkBuffer::new();
        buffer.push(chunk(vec![1, 2], 0));
        buffer.push(AudioChunk {
            samples: vec![3],
            sample_rate: 48000,
            channels: 2,
            timestamp_ms: 100,
        });

        assert!(buffer.assemble_wav(16000, 1).is_err());
    }

    #[test]
    fn sample_count_spans_chunks() {
        let mut buffer = ChunkBuffer::new();
        buffer.push(chunk(vec![0; 160], 0));
        buffer.push(chunk(vec![0; 40], 10));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.sample_count(), 200);

        buffer.clear();
        assert!(buffer.is_empty());
    }
}
