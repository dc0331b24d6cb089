use serde::{Deserialize, Serialize};

use super::control::StreamDirection;

/// A device-name hint as published by the driver's configuration.
///
/// Backends fill `name`, `description` and `direction`; the card and device
/// fields are parsed from `name` by `DeviceEnumerator::list_hints`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceHint {
    /// Device string usable for opening, e.g. `hw:CARD=PCH,DEV=0`.
    pub name: String,
    pub description: Option<String>,
    /// `None` when the device supports both directions.
    pub direction: Option<StreamDirection>,
    pub card_id: Option<String>,
    pub card_index: Option<u32>,
    pub device: Option<u32>,
}

impl DeviceHint {
    pub fn new(name: impl Into<String>, description: Option<String>, direction: Option<StreamDirection>) -> Self {
        Self {
            name: name.into(),
            description,
            direction,
            card_id: None,
            card_index: None,
            device: None,
        }
    }

    /// Whether the device can be opened in `direction`.
    pub fn supports(&self, direction: StreamDirection) -> bool {
        self.direction.is_none_or(|d| d == direction)
    }
}
