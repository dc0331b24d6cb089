//! ALSA card cursor and device-name hints.

use alsa::card::{Card, Iter};
use alsa::ctl::Ctl;
use alsa::device_name::HintIter;
use alsa::Direction;

use mixer_probe_core::models::control::StreamDirection;
use mixer_probe_core::models::error::NativeError;
use mixer_probe_core::models::hint::DeviceHint;
use mixer_probe_core::traits::card_source::CardSource;

use crate::errors::native_error;

/// `CardSource` over `snd_card_next`.
///
/// The cursor is restarted whenever the walk starts over, so one value can
/// serve repeated enumerations.
#[derive(Default)]
pub struct AlsaCards {
    cursor: Option<Iter>,
}

impl AlsaCards {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CardSource for AlsaCards {
    fn next_card(&mut self, current: Option<u32>) -> Result<Option<u32>, NativeError> {
        if current.is_none() {
            self.cursor = Some(Iter::new());
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };

        match cursor.next() {
            Some(Ok(card)) => Ok(u32::try_from(card.get_index()).ok()),
            Some(Err(e)) => {
                self.cursor = None;
                Err(native_error(e))
            }
            None => {
                self.cursor = None;
                Ok(None)
            }
        }
    }

    fn card_id(&self, index: u32) -> Result<String, NativeError> {
        let ctl = Ctl::from_card(&card(index), false).map_err(native_error)?;
        let info = ctl.card_info().map_err(native_error)?;
        info.get_id().map(str::to_string).map_err(native_error)
    }

    fn card_name(&self, index: u32) -> Result<String, NativeError> {
        card(index).get_name().map_err(native_error)
    }

    fn card_long_name(&self, index: u32) -> Result<String, NativeError> {
        card(index).get_longname().map_err(native_error)
    }

    fn device_hints(&self, iface: &str) -> Result<Vec<DeviceHint>, NativeError> {
        let hints = HintIter::new_str(None, iface).map_err(native_error)?;
        Ok(hints
            .filter_map(|hint| {
                let name = hint.name?;
                let direction = hint.direction.map(|d| match d {
                    Direction::Playback => StreamDirection::Playback,
                    Direction::Capture => StreamDirection::Capture,
                });
                Some(DeviceHint::new(name, hint.desc, direction))
            })
            .collect())
    }
}

fn card(index: u32) -> Card {
    Card::new(index as i32)
}
