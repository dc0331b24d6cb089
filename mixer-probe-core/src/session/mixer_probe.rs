use std::sync::Arc;

use crate::catalog::control_catalog::{list_controls, set_channel_label, set_channel_value};
use crate::catalog::snapshot::MixerSnapshot;
use crate::discovery::enumerator::DeviceEnumerator;
use crate::models::capability::{CandidateSet, SupportedSet};
use crate::models::card::CardDescriptor;
use crate::models::config::{DeviceSettings, SweepConfiguration};
use crate::models::control::ControlInfo;
use crate::models::error::MixerError;
use crate::models::hint::DeviceHint;
use crate::models::sweep_result::SweepReport;
use crate::probing::capability_prober::CapabilityProber;
use crate::storage::results_writer::ResultsWriter;
use crate::sweep::cancel::CancelToken;
use crate::sweep::engine::SweepEngine;
use crate::traits::card_source::CardSource;
use crate::traits::level_sampler::LevelSampler;
use crate::traits::native_mixer::MixerBackend;
use crate::traits::trial_opener::TrialOpener;

use super::mixer_session::MixerSession;

/// Entry point tying the components together for one mixer backend.
///
/// Every call that touches a card opens its own `MixerSession` and closes
/// it before returning, so no native handle outlives the call.
///
/// ```text
/// list_cards / list_hints → controls_for_card → set_value / set_label
///                                → sweep_card → SweepReport
/// probe_capabilities (independent, PCM trial opens)
/// ```
pub struct MixerProbe<B: MixerBackend> {
    backend: B,
}

impl<B: MixerBackend> MixerProbe<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Enumerate installed cards. Never fails; see `DeviceEnumerator`.
    pub fn list_cards<S: CardSource>(&self, source: S) -> Vec<CardDescriptor> {
        DeviceEnumerator::new(source).list_cards()
    }

    /// Hardware PCM devices with their card resolved. Never fails.
    pub fn list_hints<S: CardSource>(&self, source: S) -> Vec<DeviceHint> {
        DeviceEnumerator::new(source).list_hints()
    }

    pub fn open_card(&self, card: u32) -> Result<MixerSession<B::Handle>, MixerError> {
        MixerSession::open(&self.backend, card)
    }

    /// Discover a card's controls. A card whose mixer cannot be opened has
    /// no controls.
    pub fn controls_for_card(&self, card: u32) -> Vec<ControlInfo> {
        match self.open_card(card) {
            Ok(mut session) => {
                let controls = list_controls(&session);
                session.close();
                controls
            }
            Err(e) => {
                log::warn!("Card {}: {}", card, e);
                Vec::new()
            }
        }
    }

    pub fn set_value(&self, card: u32, control: &str, channel: Option<&str>, value: i64) -> Result<(), MixerError> {
        let mut session = self.open_card(card)?;
        let result = set_channel_value(&mut session, control, channel, value);
        session.close();
        result
    }

    pub fn set_label(&self, card: u32, control: &str, channel: Option<&str>, label: &str) -> Result<(), MixerError> {
        let mut session = self.open_card(card)?;
        let result = set_channel_label(&mut session, control, channel, label);
        session.close();
        result
    }

    pub fn snapshot(&self, card: u32) -> Result<MixerSnapshot, MixerError> {
        let mut session = self.open_card(card)?;
        let snapshot = MixerSnapshot::capture(&session);
        session.close();
        Ok(snapshot)
    }

    /// Write a snapshot back; per-channel failures are returned, not raised.
    pub fn restore(&self, card: u32, snapshot: &MixerSnapshot) -> Result<Vec<MixerError>, MixerError> {
        let mut session = self.open_card(card)?;
        let failures = snapshot.restore(&mut session);
        session.close();
        Ok(failures)
    }

    /// Probe the recording device in `settings` and record what it supports.
    pub fn probe_capabilities<T: TrialOpener>(
        &self,
        opener: T,
        settings: &mut DeviceSettings,
        candidates: &CandidateSet,
    ) -> SupportedSet {
        CapabilityProber::new(opener).probe(settings, candidates)
    }

    /// Run every sweep in `config` against one card.
    ///
    /// The configuration is validated before the mixer is opened. `writer`
    /// overrides the configuration's results path.
    pub fn sweep_card<L: LevelSampler + ?Sized>(
        &self,
        card: u32,
        config: &SweepConfiguration,
        sampler: &mut L,
        writer: Option<Arc<ResultsWriter>>,
        cancel: Option<CancelToken>,
    ) -> Result<SweepReport, MixerError> {
        config.validate()?;

        let mut engine = SweepEngine::from_config(config)?;
        if let Some(writer) = writer {
            engine = engine.with_writer(writer);
        }
        if let Some(cancel) = cancel {
            engine = engine.with_cancel_token(cancel);
        }

        let mut session = self.open_card(card)?;
        let report = engine.run(&mut session, &config.sweeps, sampler);
        session.close();
        report
    }
}
