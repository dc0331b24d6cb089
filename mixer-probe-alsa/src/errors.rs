use mixer_probe_core::models::error::NativeError;

pub(crate) const ENOENT: i32 = 2;
pub(crate) const ENODEV: i32 = 19;
pub(crate) const EINVAL: i32 = 22;

/// ALSA reports positive errno values; native codes are negative.
pub(crate) fn native_error(e: alsa::Error) -> NativeError {
    NativeError::new(-e.errno().abs())
}

pub(crate) fn errno(code: i32) -> NativeError {
    NativeError::new(-code)
}
