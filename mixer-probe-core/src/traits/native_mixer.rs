use crate::models::control::{ChannelId, ElementCaps, ElementId, StreamDirection};
use crate::models::error::NativeError;

/// Factory for native mixer handles.
///
/// Implemented by:
/// - `AlsaMixerBackend` (Linux, `mixer-probe-alsa`)
pub trait MixerBackend {
    type Handle: NativeMixer;

    /// Allocate an unattached mixer handle.
    fn open(&self) -> Result<Self::Handle, NativeError>;
}

/// One native mixer handle.
///
/// Lifecycle is `attach → register_simple → load → [element calls]* →
/// close`. Element calls are only valid after `load` succeeded; the
/// `MixerSession` wrapper enforces this. Handles are not safe for
/// concurrent use and take `&mut self` for every write.
///
/// Elements are addressed by `ElementId` on every call: implementations
/// look the element up again rather than caching native element pointers,
/// since the driver may reorder or drop elements between walks.
pub trait NativeMixer {
    fn attach(&mut self, device: &str) -> Result<(), NativeError>;

    /// Register the simple-element abstraction layer.
    fn register_simple(&mut self) -> Result<(), NativeError>;

    fn load(&mut self) -> Result<(), NativeError>;

    /// Release the native handle. Calling this more than once is a no-op.
    fn close(&mut self);

    /// One walk of the element list, in native order.
    fn elements(&self) -> Vec<ElementId>;

    /// `None` when the element no longer exists.
    fn caps(&self, element: &ElementId) -> Option<ElementCaps>;

    fn has_channel(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> bool;

    /// Device-declared `(min, max)` for the element's volume.
    fn volume_range(&self, element: &ElementId, direction: StreamDirection) -> Result<(i64, i64), NativeError>;

    fn volume(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> Result<i64, NativeError>;

    fn set_volume(
        &mut self,
        element: &ElementId,
        direction: StreamDirection,
        channel: ChannelId,
        value: i64,
    ) -> Result<(), NativeError>;

    /// Current level in hundredths of a dB.
    fn db(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> Result<i64, NativeError>;

    fn switch(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> Result<i32, NativeError>;

    fn set_switch(
        &mut self,
        element: &ElementId,
        direction: StreamDirection,
        channel: ChannelId,
        state: i32,
    ) -> Result<(), NativeError>;

    /// Item labels of an enumerated element, in ordinal order.
    fn enum_items(&self, element: &ElementId) -> Result<Vec<String>, NativeError>;

    fn enum_item(&self, element: &ElementId, channel: ChannelId) -> Result<u32, NativeError>;

    fn set_enum_item(&mut self, element: &ElementId, channel: ChannelId, item: u32) -> Result<(), NativeError>;
}
