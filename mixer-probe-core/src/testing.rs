//! In-memory stand-ins for the native surfaces, shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::capability::DeviceCapability;
use crate::models::control::{ChannelId, ElementCaps, ElementId, StreamDirection};
use crate::models::error::{MixerError, MixerStage, NativeError};
use crate::models::hint::DeviceHint;
use crate::traits::card_source::CardSource;
use crate::traits::level_sampler::LevelSampler;
use crate::traits::native_mixer::{MixerBackend, NativeMixer};
use crate::traits::trial_opener::TrialOpener;

const EINVAL: i32 = -22;
const EIO: i32 = -5;

// --- Cards ---

pub struct FakeCards {
    cards: Vec<(u32, Option<String>)>,
    hints: Vec<DeviceHint>,
    fail_after: Option<usize>,
    fail_hints: bool,
    position: usize,
}

impl FakeCards {
    pub fn new(cards: &[(u32, &str)]) -> Self {
        Self {
            cards: cards.iter().map(|(i, n)| (*i, Some(n.to_string()))).collect(),
            hints: Vec::new(),
            fail_after: None,
            fail_hints: false,
            position: 0,
        }
    }

    /// A card whose name cannot be resolved.
    pub fn with_unnamed(mut self, index: u32) -> Self {
        self.cards.push((index, None));
        self
    }

    /// Fail the `n`th `next_card` call (0-based).
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn with_hints(mut self, hints: &[(&str, Option<&str>, Option<StreamDirection>)]) -> Self {
        self.hints = hints
            .iter()
            .map(|(name, desc, direction)| DeviceHint::new(*name, desc.map(str::to_string), *direction))
            .collect();
        self
    }

    pub fn failing_hints(mut self) -> Self {
        self.fail_hints = true;
        self
    }
}

impl CardSource for FakeCards {
    fn next_card(&mut self, current: Option<u32>) -> Result<Option<u32>, NativeError> {
        if current.is_none() {
            self.position = 0;
        }
        if self.fail_after == Some(self.position) {
            return Err(NativeError::new(EIO));
        }
        let next = self.cards.get(self.position).map(|(i, _)| *i);
        self.position += 1;
        Ok(next)
    }

    /// The card name without spaces, as ALSA derives ids.
    fn card_id(&self, index: u32) -> Result<String, NativeError> {
        self.card_name(index).map(|n| n.replace(' ', ""))
    }

    fn card_name(&self, index: u32) -> Result<String, NativeError> {
        self.cards
            .iter()
            .find(|(i, _)| *i == index)
            .and_then(|(_, n)| n.clone())
            .ok_or(NativeError::new(EINVAL))
    }

    fn card_long_name(&self, index: u32) -> Result<String, NativeError> {
        self.card_name(index).map(|n| format!("{} long", n))
    }

    fn device_hints(&self, _iface: &str) -> Result<Vec<DeviceHint>, NativeError> {
        if self.fail_hints {
            return Err(NativeError::new(EIO));
        }
        Ok(self.hints.clone())
    }
}

// --- Mixer ---

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub id: ElementId,
    pub caps: ElementCaps,
    pub channels: Vec<(StreamDirection, ChannelId)>,
    pub range: (i64, i64),
    pub values: HashMap<ChannelId, i64>,
    pub db: Option<i64>,
    pub switches: HashMap<ChannelId, i32>,
    pub items: Vec<String>,
}

impl FakeElement {
    pub fn volume(name: &str, channels: &[ChannelId], min: i64, max: i64, value: i64) -> Self {
        Self {
            id: ElementId::new(name, 0),
            caps: ElementCaps {
                playback_volume: true,
                ..Default::default()
            },
            channels: channels.iter().map(|c| (StreamDirection::Playback, *c)).collect(),
            range: (min, max),
            values: channels.iter().map(|c| (*c, value)).collect(),
            db: None,
            switches: HashMap::new(),
            items: Vec::new(),
        }
    }

    pub fn switch(name: &str, channels: &[ChannelId], state: i32) -> Self {
        Self {
            id: ElementId::new(name, 0),
            caps: ElementCaps {
                playback_switch: true,
                ..Default::default()
            },
            channels: channels.iter().map(|c| (StreamDirection::Playback, *c)).collect(),
            range: (0, 1),
            values: HashMap::new(),
            db: None,
            switches: channels.iter().map(|c| (*c, state)).collect(),
            items: Vec::new(),
        }
    }

    pub fn enumerated(name: &str, items: &[&str], selected: i64) -> Self {
        Self {
            id: ElementId::new(name, 0),
            caps: ElementCaps {
                enumerated: true,
                ..Default::default()
            },
            channels: vec![(StreamDirection::Playback, ChannelId::MONO)],
            range: (0, items.len() as i64 - 1),
            values: [(ChannelId::MONO, selected)].into_iter().collect(),
            db: None,
            switches: HashMap::new(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Same-name elements are told apart by index.
    pub fn at_index(mut self, index: u32) -> Self {
        self.id.index = index;
        self
    }

    pub fn capture(mut self) -> Self {
        self.caps = ElementCaps {
            capture_volume: self.caps.playback_volume,
            capture_switch: self.caps.playback_switch,
            enumerated: self.caps.enumerated,
            ..Default::default()
        };
        for (direction, _) in &mut self.channels {
            *direction = StreamDirection::Capture;
        }
        self
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_switch(mut self, state: i32) -> Self {
        self.caps.playback_switch = true;
        for (_, ch) in &self.channels {
            self.switches.insert(*ch, state);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetVolume { element: String, channel: ChannelId, value: i64 },
    SetSwitch { element: String, channel: ChannelId, state: i32 },
    SetEnumItem { element: String, channel: ChannelId, item: u32 },
}

#[derive(Debug, Default)]
pub struct FakeMixerState {
    pub elements: Vec<FakeElement>,
    pub writes: Vec<Call>,
    pub attached: Vec<String>,
    pub opens: usize,
    pub closes: usize,
    pub fail_stage: Option<(MixerStage, i32)>,
    pub fail_writes: HashSet<(String, i64)>,
    pub fail_reads: HashSet<String>,
}

impl FakeMixerState {
    fn element(&self, id: &ElementId) -> Option<&FakeElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    fn element_mut(&mut self, id: &ElementId) -> Option<&mut FakeElement> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    pub fn volume_writes(&self) -> Vec<i64> {
        self.writes
            .iter()
            .filter_map(|c| match c {
                Call::SetVolume { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakeMixerBackend {
    pub state: Arc<Mutex<FakeMixerState>>,
}

impl FakeMixerBackend {
    pub fn with_elements(elements: Vec<FakeElement>) -> Self {
        let backend = Self::default();
        backend.state.lock().elements = elements;
        backend
    }

    pub fn failing_at(self, stage: MixerStage, code: i32) -> Self {
        self.state.lock().fail_stage = Some((stage, code));
        self
    }

    pub fn fail_write(&self, element: &str, value: i64) {
        self.state.lock().fail_writes.insert((element.to_string(), value));
    }

    pub fn fail_reads_of(&self, element: &str) {
        self.state.lock().fail_reads.insert(element.to_string());
    }

    pub fn set_range(&self, element: &str, min: i64, max: i64) {
        let mut state = self.state.lock();
        if let Some(e) = state.elements.iter_mut().find(|e| e.id.name == element) {
            e.range = (min, max);
        }
    }

    pub fn value(&self, element: &str, channel: ChannelId) -> Option<i64> {
        let state = self.state.lock();
        state
            .elements
            .iter()
            .find(|e| e.id.name == element)
            .and_then(|e| e.values.get(&channel).copied())
    }

    pub fn value_at(&self, element: &ElementId, channel: ChannelId) -> Option<i64> {
        self.state.lock().element(element).and_then(|e| e.values.get(&channel).copied())
    }
}

impl MixerBackend for FakeMixerBackend {
    type Handle = FakeMixer;

    fn open(&self) -> Result<FakeMixer, NativeError> {
        let mut state = self.state.lock();
        if let Some((MixerStage::Open, code)) = state.fail_stage {
            return Err(NativeError::new(code));
        }
        state.opens += 1;
        Ok(FakeMixer {
            state: Arc::clone(&self.state),
            closed: false,
        })
    }
}

pub struct FakeMixer {
    state: Arc<Mutex<FakeMixerState>>,
    closed: bool,
}

impl FakeMixer {
    fn stage(&self, stage: MixerStage) -> Result<(), NativeError> {
        match self.state.lock().fail_stage {
            Some((failing, code)) if failing == stage => Err(NativeError::new(code)),
            _ => Ok(()),
        }
    }

    fn check_write(&self, id: &ElementId, value: i64) -> Result<(), NativeError> {
        if self.state.lock().fail_writes.contains(&(id.name.clone(), value)) {
            return Err(NativeError::new(EIO));
        }
        Ok(())
    }

    fn read<T>(&self, id: &ElementId, f: impl FnOnce(&FakeElement) -> Option<T>) -> Result<T, NativeError> {
        let state = self.state.lock();
        if state.fail_reads.contains(&id.name) {
            return Err(NativeError::new(EIO));
        }
        state.element(id).and_then(f).ok_or(NativeError::new(EINVAL))
    }
}

impl NativeMixer for FakeMixer {
    fn attach(&mut self, device: &str) -> Result<(), NativeError> {
        self.stage(MixerStage::Attach)?;
        self.state.lock().attached.push(device.to_string());
        Ok(())
    }

    fn register_simple(&mut self) -> Result<(), NativeError> {
        self.stage(MixerStage::RegisterSimple)
    }

    fn load(&mut self) -> Result<(), NativeError> {
        self.stage(MixerStage::Load)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().closes += 1;
        }
    }

    fn elements(&self) -> Vec<ElementId> {
        self.state.lock().elements.iter().map(|e| e.id.clone()).collect()
    }

    fn caps(&self, element: &ElementId) -> Option<ElementCaps> {
        self.state.lock().element(element).map(|e| e.caps)
    }

    fn has_channel(&self, element: &ElementId, direction: StreamDirection, channel: ChannelId) -> bool {
        self.state
            .lock()
            .element(element)
            .is_some_and(|e| e.channels.contains(&(direction, channel)))
    }

    fn volume_range(&self, element: &ElementId, _direction: StreamDirection) -> Result<(i64, i64), NativeError> {
        self.read(element, |e| Some(e.range))
    }

    fn volume(&self, element: &ElementId, _direction: StreamDirection, channel: ChannelId) -> Result<i64, NativeError> {
        self.read(element, |e| e.values.get(&channel).copied())
    }

    fn set_volume(
        &mut self,
        element: &ElementId,
        _direction: StreamDirection,
        channel: ChannelId,
        value: i64,
    ) -> Result<(), NativeError> {
        self.check_write(element, value)?;
        let mut state = self.state.lock();
        state.writes.push(Call::SetVolume {
            element: element.name.clone(),
            channel,
            value,
        });
        let e = state.element_mut(element).ok_or(NativeError::new(EINVAL))?;
        e.values.insert(channel, value);
        Ok(())
    }

    fn db(&self, element: &ElementId, _direction: StreamDirection, _channel: ChannelId) -> Result<i64, NativeError> {
        self.read(element, |e| e.db)
    }

    fn switch(&self, element: &ElementId, _direction: StreamDirection, channel: ChannelId) -> Result<i32, NativeError> {
        self.read(element, |e| e.switches.get(&channel).copied())
    }

    fn set_switch(
        &mut self,
        element: &ElementId,
        _direction: StreamDirection,
        channel: ChannelId,
        state: i32,
    ) -> Result<(), NativeError> {
        self.check_write(element, state as i64)?;
        let mut shared = self.state.lock();
        shared.writes.push(Call::SetSwitch {
            element: element.name.clone(),
            channel,
            state,
        });
        let e = shared.element_mut(element).ok_or(NativeError::new(EINVAL))?;
        e.switches.insert(channel, state);
        Ok(())
    }

    fn enum_items(&self, element: &ElementId) -> Result<Vec<String>, NativeError> {
        self.read(element, |e| (!e.items.is_empty()).then(|| e.items.clone()))
    }

    fn enum_item(&self, element: &ElementId, channel: ChannelId) -> Result<u32, NativeError> {
        self.read(element, |e| e.values.get(&channel).map(|v| *v as u32))
    }

    fn set_enum_item(&mut self, element: &ElementId, channel: ChannelId, item: u32) -> Result<(), NativeError> {
        self.check_write(element, item as i64)?;
        let mut state = self.state.lock();
        state.writes.push(Call::SetEnumItem {
            element: element.name.clone(),
            channel,
            item,
        });
        let e = state.element_mut(element).ok_or(NativeError::new(EINVAL))?;
        e.values.insert(channel, item as i64);
        Ok(())
    }
}

impl Drop for FakeMixer {
    fn drop(&mut self) {
        self.close();
    }
}

// --- Trial opener ---

#[derive(Default)]
pub struct FakeTrialOpener {
    pub supported: HashSet<DeviceCapability>,
    pub attempts: Vec<(String, StreamDirection, DeviceCapability)>,
}

impl FakeTrialOpener {
    pub fn supporting(supported: &[DeviceCapability]) -> Self {
        Self {
            supported: supported.iter().copied().collect(),
            attempts: Vec::new(),
        }
    }
}

impl TrialOpener for FakeTrialOpener {
    fn try_open(
        &mut self,
        device: &str,
        direction: StreamDirection,
        capability: &DeviceCapability,
    ) -> Result<(), NativeError> {
        self.attempts.push((device.to_string(), direction, *capability));
        if self.supported.contains(capability) {
            Ok(())
        } else {
            Err(NativeError::new(EINVAL))
        }
    }
}

// --- Samplers ---

/// Reports the most recent volume write as the level, so tests can check
/// that every sample follows its write.
pub struct EchoSampler {
    state: Arc<Mutex<FakeMixerState>>,
    pub calls: usize,
}

impl EchoSampler {
    pub fn new(backend: &FakeMixerBackend) -> Self {
        Self {
            state: Arc::clone(&backend.state),
            calls: 0,
        }
    }
}

impl LevelSampler for EchoSampler {
    fn sample(&mut self) -> Result<f64, MixerError> {
        self.calls += 1;
        let state = self.state.lock();
        state
            .volume_writes()
            .last()
            .map(|v| *v as f64)
            .ok_or_else(|| MixerError::SampleFailed("no write before sample".into()))
    }
}

/// Plays back a fixed script of readings, then repeats the fallback.
pub struct ScriptedSampler {
    script: Vec<Result<f64, MixerError>>,
    fallback: f64,
    pub calls: usize,
}

impl ScriptedSampler {
    pub fn new(script: Vec<Result<f64, MixerError>>, fallback: f64) -> Self {
        Self {
            script,
            fallback,
            calls: 0,
        }
    }

    pub fn constant(level: f64) -> Self {
        Self::new(Vec::new(), level)
    }
}

impl LevelSampler for ScriptedSampler {
    fn sample(&mut self) -> Result<f64, MixerError> {
        let reading = self.script.get(self.calls).cloned().unwrap_or(Ok(self.fallback));
        self.calls += 1;
        reading
    }
}
