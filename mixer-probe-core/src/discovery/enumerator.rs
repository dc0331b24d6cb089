//! Card discovery.
//!
//! Walks the driver's card cursor from "before first" to exhaustion and
//! resolves a name for every card. Absence of hardware is an expected
//! condition, so failures are logged and degrade to an empty list.
//!
//! PCM device hints are listed the same way and narrowed to hardware
//! devices whose name identifies a card:
//! ```text
//! hw:CARD=PCH,DEV=0   → card id "PCH", device 0
//! hw:1,0              → card index 1, device 0
//! ```

use regex::Regex;

use crate::models::card::CardDescriptor;
use crate::models::error::MixerError;
use crate::models::hint::DeviceHint;
use crate::traits::card_source::CardSource;

const CARD_PATTERN: &str = r"(?i)^hw:CARD=([^,]+)(?:,DEV=(\d+))?$";
const INDEX_PATTERN: &str = r"(?i)^hw:(\d+),(\d+)$";

/// Enumerates the installed cards through a `CardSource`.
///
/// Takes `&mut self` per walk: the native cursor is shared state and two
/// walks must never interleave.
pub struct DeviceEnumerator<S: CardSource> {
    source: S,
}

impl<S: CardSource> DeviceEnumerator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// List every card, or an empty list if the driver reports an error.
    pub fn list_cards(&mut self) -> Vec<CardDescriptor> {
        match self.walk() {
            Ok(cards) => {
                log::debug!("Enumerated {} card(s)", cards.len());
                cards
            }
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// List hardware PCM devices, resolving each hint to its card.
    ///
    /// Hints that are not `hw:` devices, or whose name names no card, are
    /// dropped. A driver error yields an empty list.
    pub fn list_hints(&mut self) -> Vec<DeviceHint> {
        let hints = match self.source.device_hints("pcm") {
            Ok(hints) => hints,
            Err(e) => {
                log::warn!("{}", MixerError::EnumerationFailed(format!("device hints: {}", e)));
                return Vec::new();
            }
        };
        let cards = self.walk().unwrap_or_else(|e| {
            log::debug!("Hints without card lookup: {}", e);
            Vec::new()
        });

        let (Ok(by_id), Ok(by_index)) = (Regex::new(CARD_PATTERN), Regex::new(INDEX_PATTERN)) else {
            return Vec::new();
        };

        let hardware: Vec<DeviceHint> = hints
            .into_iter()
            .filter_map(|mut hint| {
                if let Some(caps) = by_id.captures(&hint.name) {
                    let id = caps[1].to_string();
                    hint.card_index = cards
                        .iter()
                        .find(|c| c.id.as_deref() == Some(id.as_str()))
                        .map(|c| c.index);
                    hint.device = caps.get(2).and_then(|m| m.as_str().parse().ok());
                    hint.card_id = Some(id);
                } else if let Some(caps) = by_index.captures(&hint.name) {
                    let index: u32 = caps[1].parse().ok()?;
                    hint.card_id = cards.iter().find(|c| c.index == index).and_then(|c| c.id.clone());
                    hint.card_index = Some(index);
                    hint.device = caps[2].parse().ok();
                } else {
                    return None;
                }
                Some(hint)
            })
            .collect();

        log::debug!("Listed {} hardware PCM device(s)", hardware.len());
        hardware
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn walk(&mut self) -> Result<Vec<CardDescriptor>, MixerError> {
        let mut cards = Vec::new();
        let mut current = None;

        loop {
            let next = self
                .source
                .next_card(current)
                .map_err(|e| MixerError::EnumerationFailed(e.to_string()))?;

            let Some(index) = next else {
                return Ok(cards);
            };

            // The cursor only moves forward; anything else would loop forever.
            if current.is_some_and(|prev| index <= prev) {
                return Err(MixerError::EnumerationFailed(format!(
                    "card cursor did not advance past {}",
                    index
                )));
            }

            let name = self.source.card_name(index).unwrap_or_else(|e| {
                log::debug!("Card {} has no resolvable name: {}", index, e);
                String::new()
            });
            let id = self.source.card_id(index).ok();
            let long_name = self.source.card_long_name(index).ok();

            cards.push(CardDescriptor {
                index,
                id,
                name,
                long_name,
            });
            current = Some(index);
        }
    }
}
