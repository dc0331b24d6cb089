//! PCM trial opens for capability probing.

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};

use mixer_probe_core::models::capability::DeviceCapability;
use mixer_probe_core::models::control::StreamDirection;
use mixer_probe_core::models::error::NativeError;
use mixer_probe_core::traits::trial_opener::TrialOpener;

use crate::errors::{errno, native_error, EINVAL};

/// Opens the PCM, commits hw params for exactly one triple, then drops it.
///
/// Resampling is disabled and the rate the driver settles on must equal the
/// requested one, so plugin conversion never counts as support.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlsaTrialOpener;

impl TrialOpener for AlsaTrialOpener {
    fn try_open(
        &mut self,
        device: &str,
        direction: StreamDirection,
        capability: &DeviceCapability,
    ) -> Result<(), NativeError> {
        let format = pcm_format(capability.bits)?;
        let pcm = PCM::new(device, alsa_direction(direction), false).map_err(native_error)?;
        configure(&pcm, format, capability)
    }
}

fn configure(pcm: &PCM, format: Format, capability: &DeviceCapability) -> Result<(), NativeError> {
    let hwp = HwParams::any(pcm).map_err(native_error)?;
    hwp.set_rate_resample(false).map_err(native_error)?;
    hwp.set_access(Access::RWInterleaved).map_err(native_error)?;
    hwp.set_format(format).map_err(native_error)?;
    hwp.set_channels(u32::from(capability.channels)).map_err(native_error)?;
    hwp.set_rate(capability.rate, ValueOr::Nearest).map_err(native_error)?;

    let actual = hwp.get_rate().map_err(native_error)?;
    if actual != capability.rate {
        log::debug!("Requested {} Hz, driver offered {} Hz", capability.rate, actual);
        return Err(errno(EINVAL));
    }
    pcm.hw_params(&hwp).map_err(native_error)
}

pub(crate) fn pcm_format(bits: u16) -> Result<Format, NativeError> {
    match bits {
        8 => Ok(Format::U8),
        16 => Ok(Format::S16LE),
        24 => Ok(Format::S24LE),
        32 => Ok(Format::S32LE),
        _ => Err(errno(EINVAL)),
    }
}

pub(crate) fn alsa_direction(direction: StreamDirection) -> Direction {
    match direction {
        StreamDirection::Playback => Direction::Playback,
        StreamDirection::Capture => Direction::Capture,
    }
}
