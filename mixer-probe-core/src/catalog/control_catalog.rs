//! Mixer control discovery and value access.
//!
//! Every call walks the session's elements afresh. Writes re-query the
//! hardware range immediately before touching the device and never issue
//! a native write for an out-of-range value.
//!
//! The name-addressed calls use the first element in native order with that
//! name. Drivers often expose several elements under one name (e.g. two
//! `Capture` elements at index 0 and 1); the `*_element_*` calls take the
//! full `ElementId` and address exactly one of them.

use crate::models::control::{
    ChannelId, ControlChannelInfo, ControlInfo, ControlKind, ElementCaps, ElementId, StreamDirection,
};
use crate::models::error::MixerError;
use crate::session::mixer_session::MixerSession;
use crate::traits::native_mixer::NativeMixer;

use super::labels::label_to_ordinal;

/// Discover every control reachable from the session.
///
/// Elements that cannot be read, report an inverted range, or expose no
/// volume/switch/item capability are left out and logged.
pub fn list_controls<H: NativeMixer>(session: &MixerSession<H>) -> Vec<ControlInfo> {
    let Ok(native) = session.native() else {
        return Vec::new();
    };
    native
        .elements()
        .iter()
        .filter_map(|id| read_control(native, id))
        .collect()
}

/// Fresh read of one control by exact name.
pub fn find_control<H: NativeMixer>(session: &MixerSession<H>, control: &str) -> Result<ControlInfo, MixerError> {
    let native = session.native()?;
    let id = find_element(native, control)?;
    read_control(native, &id).ok_or_else(|| not_found(control))
}

/// Current raw value of one channel (the first channel when `channel` is `None`).
pub fn get_channel_value<H: NativeMixer>(
    session: &MixerSession<H>,
    control: &str,
    channel: Option<&str>,
) -> Result<i64, MixerError> {
    let id = find_element(session.native()?, control)?;
    get_element_value(session, &id, channel)
}

/// `get_channel_value` for one exact element.
pub fn get_element_value<H: NativeMixer>(
    session: &MixerSession<H>,
    element: &ElementId,
    channel: Option<&str>,
) -> Result<i64, MixerError> {
    let native = session.native()?;
    let target = Target::resolve(native, element.clone(), channel)?;
    let ch = target.channels[0];
    target.read(native, ch)
}

/// Write `value` to one channel, or to every channel when `channel` is `None`.
///
/// Fails with `OutOfRange` before any native write if `value` lies outside
/// the range the hardware reports right now.
pub fn set_channel_value<H: NativeMixer>(
    session: &mut MixerSession<H>,
    control: &str,
    channel: Option<&str>,
    value: i64,
) -> Result<(), MixerError> {
    let id = find_element(session.native()?, control)?;
    set_element_value(session, &id, channel, value)
}

/// `set_channel_value` for one exact element.
pub fn set_element_value<H: NativeMixer>(
    session: &mut MixerSession<H>,
    element: &ElementId,
    channel: Option<&str>,
    value: i64,
) -> Result<(), MixerError> {
    let native = session.native_mut()?;
    let target = Target::resolve(&*native, element.clone(), channel)?;

    let (min, max) = target.live_range(&*native)?;
    if value < min || value > max {
        return Err(MixerError::OutOfRange {
            control: element.name.clone(),
            value,
            min,
            max,
        });
    }

    for &ch in &target.channels {
        target.write(native, ch, value)?;
    }
    log::debug!("{}#{} [{}] <- {}", element.name, element.index, channel.unwrap_or("all"), value);
    Ok(())
}

/// Label of the selected item of an enumerated control.
pub fn get_channel_label<H: NativeMixer>(
    session: &MixerSession<H>,
    control: &str,
    channel: Option<&str>,
) -> Result<String, MixerError> {
    let native = session.native()?;
    let target = Target::resolve(native, find_element(native, control)?, channel)?;
    let items = target.items(native)?;
    let ordinal = target.read(native, target.channels[0])?;
    usize::try_from(ordinal)
        .ok()
        .and_then(|i| items.get(i).cloned())
        .ok_or(MixerError::ReadFailed {
            control: control.to_string(),
            code: 0,
        })
}

/// Select an enumerated item by its label.
pub fn set_channel_label<H: NativeMixer>(
    session: &mut MixerSession<H>,
    control: &str,
    channel: Option<&str>,
    label: &str,
) -> Result<(), MixerError> {
    let (id, ordinal) = {
        let native = session.native()?;
        let target = Target::resolve(native, find_element(native, control)?, channel)?;
        let items = target.items(native)?;
        let ordinal = label_to_ordinal(&items, label).ok_or_else(|| MixerError::LabelNotFound {
            control: control.to_string(),
            label: label.to_string(),
        })?;
        (target.id, ordinal)
    };
    set_element_value(session, &id, channel, ordinal as i64)
}

/// A resolved control plus the channels an operation applies to.
struct Target {
    id: ElementId,
    kind: ControlKind,
    direction: StreamDirection,
    channels: Vec<ChannelId>,
}

impl Target {
    fn resolve<H: NativeMixer>(native: &H, id: ElementId, channel: Option<&str>) -> Result<Self, MixerError> {
        let control = id.name.as_str();
        let caps = native.caps(&id).ok_or_else(|| not_found(control))?;
        let kind = caps.kind().ok_or_else(|| not_found(control))?;
        let direction = caps.direction();

        let present: Vec<ChannelId> = ChannelId::ALL
            .iter()
            .copied()
            .filter(|ch| has_channel(native, &id, kind, direction, *ch))
            .collect();

        let channels = match channel {
            None if present.is_empty() => return Err(not_found(control)),
            None => present,
            Some(name) => {
                let wanted = name.parse::<ChannelId>().ok();
                match wanted.filter(|ch| present.contains(ch)) {
                    Some(ch) => vec![ch],
                    None => {
                        return Err(MixerError::ChannelNotFound {
                            control: control.to_string(),
                            channel: name.to_string(),
                        })
                    }
                }
            }
        };

        Ok(Self {
            id,
            kind,
            direction,
            channels,
        })
    }

    fn items<H: NativeMixer>(&self, native: &H) -> Result<Vec<String>, MixerError> {
        if self.kind != ControlKind::Enumerated {
            return Err(MixerError::NotEnumerated {
                control: self.id.name.clone(),
            });
        }
        native.enum_items(&self.id).map_err(|e| self.read_failed(e.code))
    }

    fn live_range<H: NativeMixer>(&self, native: &H) -> Result<(i64, i64), MixerError> {
        match self.kind {
            ControlKind::Volume => native
                .volume_range(&self.id, self.direction)
                .map_err(|e| self.read_failed(e.code)),
            ControlKind::Switch => Ok((0, 1)),
            ControlKind::Enumerated => {
                let count = self.items(native)?.len() as i64;
                Ok((0, count - 1))
            }
        }
    }

    fn read<H: NativeMixer>(&self, native: &H, ch: ChannelId) -> Result<i64, MixerError> {
        let value = match self.kind {
            ControlKind::Volume => native.volume(&self.id, self.direction, ch),
            ControlKind::Switch => native.switch(&self.id, self.direction, ch).map(i64::from),
            ControlKind::Enumerated => native.enum_item(&self.id, ch).map(i64::from),
        };
        value.map_err(|e| self.read_failed(e.code))
    }

    fn write<H: NativeMixer>(&self, native: &mut H, ch: ChannelId, value: i64) -> Result<(), MixerError> {
        let result = match self.kind {
            ControlKind::Volume => native.set_volume(&self.id, self.direction, ch, value),
            // Range-checked to [0, 1] and [0, items) by the caller.
            ControlKind::Switch => native.set_switch(&self.id, self.direction, ch, value as i32),
            ControlKind::Enumerated => native.set_enum_item(&self.id, ch, value as u32),
        };
        result.map_err(|e| MixerError::WriteFailed {
            control_name: self.id.name.clone(),
            attempted_value: value,
            code: e.code,
        })
    }

    fn read_failed(&self, code: i32) -> MixerError {
        MixerError::ReadFailed {
            control: self.id.name.clone(),
            code,
        }
    }
}

fn find_element<H: NativeMixer>(native: &H, control: &str) -> Result<ElementId, MixerError> {
    native
        .elements()
        .into_iter()
        .find(|id| id.name == control)
        .ok_or_else(|| not_found(control))
}

fn has_channel<H: NativeMixer>(
    native: &H,
    id: &ElementId,
    kind: ControlKind,
    direction: StreamDirection,
    ch: ChannelId,
) -> bool {
    match kind {
        ControlKind::Enumerated => {
            native.has_channel(id, StreamDirection::Playback, ch) || native.has_channel(id, StreamDirection::Capture, ch)
        }
        _ => native.has_channel(id, direction, ch),
    }
}

fn read_control<H: NativeMixer>(native: &H, id: &ElementId) -> Option<ControlInfo> {
    let caps = native.caps(id)?;
    let Some(kind) = caps.kind() else {
        log::debug!("Skipping {}: no volume, switch or items", id.name);
        return None;
    };
    let direction = caps.direction();

    let items = if kind == ControlKind::Enumerated {
        match native.enum_items(id) {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => {
                log::warn!("Skipping {}: enumerated control without items", id.name);
                return None;
            }
            Err(e) => {
                log::warn!("Skipping {}: reading items failed: {}", id.name, e);
                return None;
            }
        }
    } else {
        Vec::new()
    };

    let (min, max) = match kind {
        ControlKind::Volume => match native.volume_range(id, direction) {
            Ok(range) => range,
            Err(e) => {
                log::warn!("Skipping {}: reading range failed: {}", id.name, e);
                return None;
            }
        },
        ControlKind::Switch => (0, 1),
        ControlKind::Enumerated => (0, items.len() as i64 - 1),
    };
    if min > max {
        log::warn!("Skipping {}: hardware reports inverted range [{}, {}]", id.name, min, max);
        return None;
    }

    let channels: Vec<ControlChannelInfo> = ChannelId::ALL
        .iter()
        .copied()
        .filter(|ch| has_channel(native, id, kind, direction, *ch))
        .filter_map(|ch| read_channel(native, id, kind, &caps, direction, ch, (min, max)))
        .collect();

    if channels.is_empty() {
        log::debug!("Skipping {}: no readable channels", id.name);
        return None;
    }

    Some(ControlInfo {
        control_name: id.name.clone(),
        index: id.index,
        kind,
        channels,
        items,
    })
}

fn read_channel<H: NativeMixer>(
    native: &H,
    id: &ElementId,
    kind: ControlKind,
    caps: &ElementCaps,
    direction: StreamDirection,
    ch: ChannelId,
    (min, max): (i64, i64),
) -> Option<ControlChannelInfo> {
    let raw = match kind {
        ControlKind::Volume => native.volume(id, direction, ch),
        ControlKind::Switch => native.switch(id, direction, ch).map(i64::from),
        ControlKind::Enumerated => native.enum_item(id, ch).map(i64::from),
    };
    let raw = match raw {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("{} {}: read failed: {}", id.name, ch, e);
            return None;
        }
    };
    if raw < min || raw > max {
        log::warn!("{} {}: value {} outside [{}, {}], ignoring channel", id.name, ch, raw, min, max);
        return None;
    }

    let db = match kind {
        ControlKind::Volume => native.db(id, direction, ch).ok(),
        _ => None,
    };
    let switch_state = if caps.has_switch(direction) {
        native.switch(id, direction, ch).ok()
    } else {
        None
    };

    Some(ControlChannelInfo {
        name: ch.short_name().to_string(),
        channel: ch,
        direction,
        raw,
        min,
        max,
        db,
        switch_state,
    })
}

fn not_found(control: &str) -> MixerError {
    MixerError::ControlNotFound {
        control: control.to_string(),
    }
}
