use crate::models::error::NativeError;
use crate::models::hint::DeviceHint;

/// Driver surface for walking the installed cards.
///
/// Implemented by:
/// - `AlsaCards` (Linux, `mixer-probe-alsa`)
pub trait CardSource {
    /// Advance the native card cursor.
    ///
    /// `current = None` restarts the walk from before the first card.
    /// Returns `Ok(None)` once there are no more cards.
    fn next_card(&mut self, current: Option<u32>) -> Result<Option<u32>, NativeError>;

    /// Driver identifier of the card (e.g. "PCH").
    fn card_id(&self, index: u32) -> Result<String, NativeError>;

    /// Short card name (e.g. "USB Audio").
    fn card_name(&self, index: u32) -> Result<String, NativeError>;

    /// Descriptive card name as reported by the driver.
    fn card_long_name(&self, index: u32) -> Result<String, NativeError>;

    /// Every device-name hint for interface `iface` ("pcm", "ctl"), across
    /// all cards. Only `name`, `description` and `direction` are filled.
    fn device_hints(&self, iface: &str) -> Result<Vec<DeviceHint>, NativeError>;
}

impl<T: CardSource + ?Sized> CardSource for &mut T {
    fn next_card(&mut self, current: Option<u32>) -> Result<Option<u32>, NativeError> {
        (**self).next_card(current)
    }

    fn card_id(&self, index: u32) -> Result<String, NativeError> {
        (**self).card_id(index)
    }

    fn card_name(&self, index: u32) -> Result<String, NativeError> {
        (**self).card_name(index)
    }

    fn card_long_name(&self, index: u32) -> Result<String, NativeError> {
        (**self).card_long_name(index)
    }

    fn device_hints(&self, iface: &str) -> Result<Vec<DeviceHint>, NativeError> {
        (**self).device_hints(iface)
    }
}
