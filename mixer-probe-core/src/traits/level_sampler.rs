use crate::models::error::MixerError;

/// Source of one scalar audio level reading (RMS, dBFS, ...).
///
/// The sweep engine calls `sample` exactly once per applied value, after
/// the write and the settle delay. Implementations may block for the
/// duration of their measurement window.
pub trait LevelSampler {
    fn sample(&mut self) -> Result<f64, MixerError>;
}

