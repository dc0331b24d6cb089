use crate::models::capability::DeviceCapability;
use crate::models::control::StreamDirection;
use crate::models::error::NativeError;

/// Opens a throwaway stream to test one exact stream configuration.
///
/// Implementations must configure exactly the requested triple (no
/// "nearest" fallback) and release the trial handle before returning,
/// whether or not configuration succeeded.
pub trait TrialOpener {
    fn try_open(
        &mut self,
        device: &str,
        direction: StreamDirection,
        capability: &DeviceCapability,
    ) -> Result<(), NativeError>;
}
