use serde::{Deserialize, Serialize};

use crate::models::control::ElementId;
use crate::models::error::MixerError;
use crate::session::mixer_session::MixerSession;
use crate::traits::native_mixer::NativeMixer;

use super::control_catalog::{list_controls, set_element_value};

/// One channel's value at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub control_name: String,
    #[serde(default)]
    pub index: u32,
    pub channel: String,
    pub value: i64,
}

/// Every channel value of a card's mixer, for putting hardware back the way
/// it was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixerSnapshot {
    pub device: String,
    pub entries: Vec<SnapshotEntry>,
}

impl MixerSnapshot {
    pub fn capture<H: NativeMixer>(session: &MixerSession<H>) -> Self {
        let entries = list_controls(session)
            .into_iter()
            .flat_map(|control| {
                let name = control.control_name;
                let index = control.index;
                control.channels.into_iter().map(move |ch| SnapshotEntry {
                    control_name: name.clone(),
                    index,
                    channel: ch.name,
                    value: ch.raw,
                })
            })
            .collect();

        Self {
            device: session.device().to_string(),
            entries,
        }
    }

    /// Write every entry back. Best-effort: a failing channel does not stop
    /// the rest, and its error is returned.
    pub fn restore<H: NativeMixer>(&self, session: &mut MixerSession<H>) -> Vec<MixerError> {
        let failures: Vec<MixerError> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let element = ElementId::new(entry.control_name.as_str(), entry.index);
                set_element_value(session, &element, Some(entry.channel.as_str()), entry.value).err()
            })
            .collect();

        if !failures.is_empty() {
            log::warn!(
                "Restored {} of {} mixer values on {}",
                self.entries.len() - failures.len(),
                self.entries.len(),
                self.device
            );
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
