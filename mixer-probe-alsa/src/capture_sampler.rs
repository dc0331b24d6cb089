//! Level sampling from an ALSA capture stream.

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};

use mixer_probe_core::models::error::MixerError;
use mixer_probe_core::processing::levels;
use mixer_probe_core::traits::level_sampler::LevelSampler;

/// Reads a fixed window of S16 frames per sample and reports its dBFS.
///
/// Audio buffered before the call is discarded first, so each reading
/// reflects the mixer state at the time of the call.
pub struct AlsaCaptureSampler {
    pcm: PCM,
    channels: usize,
    window_frames: usize,
}

impl AlsaCaptureSampler {
    pub fn open(device: &str, rate: u32, channels: u16, window_frames: usize) -> Result<Self, MixerError> {
        let pcm = PCM::new(device, Direction::Capture, false).map_err(|e| sample_failed(device, e))?;
        {
            let hwp = HwParams::any(&pcm).map_err(|e| sample_failed(device, e))?;
            hwp.set_access(Access::RWInterleaved).map_err(|e| sample_failed(device, e))?;
            hwp.set_format(Format::s16()).map_err(|e| sample_failed(device, e))?;
            hwp.set_channels(u32::from(channels)).map_err(|e| sample_failed(device, e))?;
            hwp.set_rate(rate, ValueOr::Nearest).map_err(|e| sample_failed(device, e))?;
            pcm.hw_params(&hwp).map_err(|e| sample_failed(device, e))?;
        }
        log::info!("Capture sampler on {}: {} Hz, {} ch, {} frames", device, rate, channels, window_frames);

        Ok(Self {
            pcm,
            channels: usize::from(channels.max(1)),
            window_frames: window_frames.max(1),
        })
    }

    /// Per-channel RMS of one window.
    pub fn channel_levels(&mut self) -> Result<Vec<f32>, MixerError> {
        let samples = self.read_window()?;
        Ok(levels::interleaved_rms(&samples, self.channels))
    }

    fn read_window(&mut self) -> Result<Vec<f32>, MixerError> {
        self.pcm.drop().map_err(|e| sample_failed("capture", e))?;
        self.pcm.prepare().map_err(|e| sample_failed("capture", e))?;

        let io = self.pcm.io_i16().map_err(|e| sample_failed("capture", e))?;
        let mut buf = vec![0i16; self.window_frames * self.channels];
        let mut filled = 0;

        while filled < buf.len() {
            match io.readi(&mut buf[filled..]) {
                Ok(frames) => filled += frames * self.channels,
                Err(e) => {
                    log::debug!("Capture read failed, recovering: {}", e);
                    self.pcm.try_recover(e, true).map_err(|e| sample_failed("capture", e))?;
                }
            }
        }

        Ok(levels::from_i16(&buf))
    }
}

impl LevelSampler for AlsaCaptureSampler {
    fn sample(&mut self) -> Result<f64, MixerError> {
        let samples = self.read_window()?;
        Ok(levels::dbfs_from_rms(levels::rms(&samples)))
    }
}

fn sample_failed(device: &str, e: alsa::Error) -> MixerError {
    MixerError::SampleFailed(format!("{}: {}", device, e))
}
