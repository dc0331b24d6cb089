//! ALSA simple-element mixer.
//!
//! Elements are found again by `SelemId` on every call; no `Elem` or
//! `Selem` is kept across calls since both borrow the mixer and the driver
//! may rebuild its element list.

use std::ffi::CString;

use alsa::mixer::{Mixer, Selem, SelemChannelId, SelemId};

use mixer_probe_core::models::control::{ChannelId, ElementCaps, ElementId, StreamDirection};
use mixer_probe_core::models::error::NativeError;
use mixer_probe_core::traits::native_mixer::{MixerBackend, NativeMixer};

use crate::errors::{errno, native_error, EINVAL, ENODEV, ENOENT};

/// Opens blocking ALSA mixer handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlsaMixerBackend;

impl MixerBackend for AlsaMixerBackend {
    type Handle = AlsaMixer;

    fn open(&self) -> Result<AlsaMixer, NativeError> {
        let mixer = Mixer::open(false).map_err(native_error)?;
        Ok(AlsaMixer { mixer: Some(mixer) })
    }
}

/// One `snd_mixer_t`. Dropping the inner `Mixer` closes it.
pub struct AlsaMixer {
    mixer: Option<Mixer>,
}

impl AlsaMixer {
    fn mixer(&self) -> Result<&Mixer, NativeError> {
        self.mixer.as_ref().ok_or(errno(ENODEV))
    }

    fn mixer_mut(&mut self) -> Result<&mut Mixer, NativeError> {
        self.mixer.as_mut().ok_or(errno(ENODEV))
    }

    fn selem(&self, element: &ElementId) -> Result<Selem<'_>, NativeError> {
        let id = SelemId::new(&element.name, element.index);
        self.mixer()?.find_selem(&id).ok_or(errno(ENOENT))
    }
}

impl NativeMixer for AlsaMixer {
    fn attach(&mut self, device: &str) -> Result<(), NativeError> {
        let name = CString::new(device).map_err(|_| errno(EINVAL))?;
        self.mixer_mut()?.attach(&name).map_err(native_error)
    }

    fn register_simple(&mut self) -> Result<(), NativeError> {
        Selem::register(self.mixer_mut()?).map_err(native_error)
    }

    fn load(&mut self) -> Result<(), NativeError> {
        self.mixer_mut()?.load().map_err(native_error)
    }

    fn close(&mut self) {
        self.mixer.take();
    }

    fn elements(&self) -> Vec<ElementId> {
        let Ok(mixer) = self.mixer() else {
            return Vec::new();
        };
        mixer
            .iter()
            .filter_map(Selem::new)
            .filter_map(|selem| {
                let id = selem.get_id();
                match id.get_name() {
                    Ok(name) => Some(ElementId::new(name, id.get_index())),
                    Err(e) => {
                        log::debug!("Skipping element with unreadable name: {}", e);
                        None
                    }
                }
            })
            .collect()
    }

    fn caps(&self, element: &ElementId) -> Option<ElementCaps> {
        let selem = self.selem(element).ok()?;
        Some(ElementCaps {
            playback_volume: selem.has_playback_volume(),
            capture_volume: selem.has_capture_volume(),
            playback_switch: selem.has_playback_switch(),
            capture_switch: selem.has_capture_switch(),
            enumerated: selem.is_enumerated(),
        })
    }

    fn has_channel(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> bool {
        let Ok(selem) = self.selem(element) else {
            return false;
        };
        match direction {
            StreamDirection::Playback => selem.has_playback_channel(selem_channel(channel)),
            StreamDirection::Capture => selem.has_capture_channel(selem_channel(channel)),
        }
    }

    fn volume_range(&self, element: &ElementId, direction: StreamDirection) -> Result<(i64, i64), NativeError> {
        let selem = self.selem(element)?;
        Ok(match direction {
            StreamDirection::Playback => selem.get_playback_volume_range(),
            StreamDirection::Capture => selem.get_capture_volume_range(),
        })
    }

    fn volume(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> Result<i64, NativeError> {
        let selem = self.selem(element)?;
        let ch = selem_channel(channel);
        match direction {
            StreamDirection::Playback => selem.get_playback_volume(ch),
            StreamDirection::Capture => selem.get_capture_volume(ch),
        }
        .map_err(native_error)
    }

    fn set_volume(
        &mut self,
        element: &ElementId,
        direction: StreamDirection,
        channel: ChannelId,
        value: i64,
    ) -> Result<(), NativeError> {
        let selem = self.selem(element)?;
        let ch = selem_channel(channel);
        match direction {
            StreamDirection::Playback => selem.set_playback_volume(ch, value),
            StreamDirection::Capture => selem.set_capture_volume(ch, value),
        }
        .map_err(native_error)
    }

    fn db(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> Result<i64, NativeError> {
        let selem = self.selem(element)?;
        let ch = selem_channel(channel);
        let db = match direction {
            StreamDirection::Playback => selem.get_playback_vol_db(ch),
            StreamDirection::Capture => selem.get_capture_vol_db(ch),
        }
        .map_err(native_error)?;
        Ok(db.0)
    }

    fn switch(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> Result<i32, NativeError> {
        let selem = self.selem(element)?;
        let ch = selem_channel(channel);
        match direction {
            StreamDirection::Playback => selem.get_playback_switch(ch),
            StreamDirection::Capture => selem.get_capture_switch(ch),
        }
        .map_err(native_error)
    }

    fn set_switch(
        &mut self,
        element: &ElementId,
        direction: StreamDirection,
        channel: ChannelId,
        state: i32,
    ) -> Result<(), NativeError> {
        let selem = self.selem(element)?;
        let ch = selem_channel(channel);
        match direction {
            StreamDirection::Playback => selem.set_playback_switch(ch, state),
            StreamDirection::Capture => selem.set_capture_switch(ch, state),
        }
        .map_err(native_error)
    }

    fn enum_items(&self, element: &ElementId) -> Result<Vec<String>, NativeError> {
        let selem = self.selem(element)?;
        let items = selem.iter_enum().map_err(native_error)?;
        items.collect::<Result<Vec<_>, _>>().map_err(native_error)
    }

    fn enum_item(&self, element: &ElementId, channel: ChannelId) -> Result<u32, NativeError> {
        let selem = self.selem(element)?;
        selem.get_enum_item(selem_channel(channel)).map_err(native_error)
    }

    fn set_enum_item(&mut self, element: &ElementId, channel: ChannelId, item: u32) -> Result<(), NativeError> {
        let selem = self.selem(element)?;
        selem.set_enum_item(selem_channel(channel), item).map_err(native_error)
    }
}

fn selem_channel(channel: ChannelId) -> SelemChannelId {
    match channel {
        ChannelId::FrontLeft => SelemChannelId::FrontLeft,
        ChannelId::FrontRight => SelemChannelId::FrontRight,
        ChannelId::RearLeft => SelemChannelId::RearLeft,
        ChannelId::RearRight => SelemChannelId::RearRight,
        ChannelId::FrontCenter => SelemChannelId::FrontCenter,
        ChannelId::Woofer => SelemChannelId::Woofer,
        ChannelId::SideLeft => SelemChannelId::SideLeft,
        ChannelId::SideRight => SelemChannelId::SideRight,
        ChannelId::RearCenter => SelemChannelId::RearCenter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_mapping_follows_alsa_order() {
        for (i, ch) in ChannelId::ALL.iter().enumerate() {
            assert_eq!(selem_channel(*ch) as i32, i as i32);
        }
    }

    #[test]
    fn closed_handle_reports_no_elements() {
        let mut mixer = AlsaMixer { mixer: None };
        assert!(mixer.elements().is_empty());
        assert_eq!(mixer.load(), Err(errno(ENODEV)));
        mixer.close();
    }
}
