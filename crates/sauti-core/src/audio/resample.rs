//! Linear-interpolation resampling.

/// Resample `input` from `source_rate` to `target_rate` by linear
/// interpolation.
///
/// Output length is `floor(input.len() * target_rate / source_rate)`. For
/// each output index the two nearest source samples are blended by the
/// fractional source position; the final source sample is clamped so the
/// interpolation never reads past the end. Equal rates are an identity
/// pass-through.
pub fn resample_linear(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || input.is_empty() || source_rate == 0 || target_rate == 0 {
        return input.to_vec();
    }

    let output_len = (input.len() as u64 * target_rate as u64 / source_rate as u64) as usize;
    let step = source_rate as f64 / target_rate as f64;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * step;
        let idx0 = src_pos as usize;
        let idx1 = (idx0 + 1).min(input.len() - 1);
        let frac = src_pos - idx0 as f64;
        let blended = input[idx0] as f64 * (1.0 - frac) + input[idx1] as f64 * frac;
        output.push(blended as f32);
    }

    output
}
