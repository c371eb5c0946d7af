//! WAV read/write built on `hound`.
//!
//! The writer emits the canonical 44-byte-header container: mono, 16-bit
//! PCM, uncompressed little-endian. The reader accepts any PCM or float
//! WAV, normalizes to f32 in [-1, 1] and downmixes multichannel input to
//! mono, since the recognizers consume a single channel.

use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Write mono 16-bit PCM samples to a WAV file at the given sample rate.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!(
        "wrote {} samples @ {} Hz to {}",
        samples.len(),
        sample_rate,
        path.display()
    );
    Ok(())
}

/// Read a WAV file into normalized f32 samples plus its sample rate.
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let bytes = std::fs::read(path)?;
    read_wav_bytes(&bytes)
}

/// Decode an in-memory WAV container into normalized f32 samples.
///
/// Validates the RIFF/WAVE structure, scans sub-chunks for `fmt ` and
/// `data`, and skips anything else. A container without sample data is
/// rejected rather than decoded to an empty buffer.
pub fn read_wav_bytes(wav_bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
    let cursor = Cursor::new(wav_bytes);
    let mut reader = hound::WavReader::new(cursor)
        .map_err(|e| Error::Audio(format!("failed to parse WAV: {e}")))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels.max(1) as usize;

    let mut samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample.max(1) as u32;
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| (s as f32 / scale).clamp(-1.0, 1.0))
                .collect()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().filter_map(|s| s.ok()).collect(),
    };

    if samples.is_empty() {
        return Err(Error::Audio("WAV contains no sample data".to_string()));
    }

    if channels > 1 {
        let mut mono = Vec::with_capacity(samples.len() / channels + 1);
        for frame in samples.chunks(channels) {
            let sum: f32 = frame.iter().copied().sum();
            mono.push(sum / frame.len() as f32);
        }
        samples = mono;
    }

    for sample in &mut samples {
        if !sample.is_finite() {
            *sample = 0.0;
        } else {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    Ok((samples, sample_rate))
}
