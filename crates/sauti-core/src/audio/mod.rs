//! WAV container codec and sample-rate conversion.

mod resample;
mod wav;

pub use resample::resample_linear;
pub use wav::{read_wav, read_wav_bytes, write_wav};

/// Convert normalized f32 samples in [-1, 1] to signed 16-bit PCM.
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect()
}

/// Convert signed 16-bit PCM to normalized f32 samples.
pub fn i16_to_f32(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}
