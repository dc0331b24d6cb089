//! Level math for sampled audio.
//!
//! Buffers are normalized `f32` in `[-1.0, 1.0]`; interleaved buffers are
//! `[c0, c1, .., c0, c1, ..]`.

/// Lowest level a sampler reports for digital silence.
pub const SILENCE_DBFS: f64 = f64::NEG_INFINITY;

/// RMS level of samples (0.0 for an empty buffer).
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Peak absolute level of samples.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Decibels relative to full scale for an RMS amplitude.
pub fn dbfs_from_rms(rms: f32) -> f64 {
    if rms <= 0.0 {
        return SILENCE_DBFS;
    }
    20.0 * f64::from(rms).log10()
}

/// Inverse of [`dbfs_from_rms`]. NaN stays NaN.
pub fn rms_from_dbfs(dbfs: f64) -> f32 {
    if dbfs.is_nan() {
        return f32::NAN;
    }
    10f64.powf(dbfs / 20.0) as f32
}

/// Per-channel RMS of an interleaved buffer. A trailing partial frame is
/// ignored.
pub fn interleaved_rms(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels == 0 {
        return Vec::new();
    }
    let frames = samples.len() / channels;
    if frames == 0 {
        return vec![0.0; channels];
    }

    let mut sums = vec![0.0f32; channels];
    for frame in samples.chunks_exact(channels) {
        for (sum, s) in sums.iter_mut().zip(frame) {
            *sum += s * s;
        }
    }
    sums.into_iter().map(|sum| (sum / frames as f32).sqrt()).collect()
}

/// Normalize signed 16-bit samples to `f32`.
pub fn from_i16(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|s| f32::from(*s) / 32768.0).collect()
}
