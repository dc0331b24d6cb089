//! Stream capability probing.
//!
//! Only a trial open with an exact `(rate, bits, channels)` triple makes
//! that triple supported. The three independent value sets are derived
//! from the successful triples, never the other way round.

use std::collections::HashSet;

use crate::models::capability::{CandidateSet, SupportedSet};
use crate::models::config::DeviceSettings;
use crate::models::control::StreamDirection;
use crate::models::error::MixerError;
use crate::traits::trial_opener::TrialOpener;

/// Upper bound on trial opens per probe. Each trial opens and configures a
/// real device, so oversized candidate sets are truncated.
pub const MAX_TRIALS: usize = 256;

pub struct CapabilityProber<T: TrialOpener> {
    opener: T,
}

impl<T: TrialOpener> CapabilityProber<T> {
    pub fn new(opener: T) -> Self {
        Self { opener }
    }

    /// Probe the recording device named in `settings` and store the result
    /// in its `supported_*` lists.
    pub fn probe(&mut self, settings: &mut DeviceSettings, candidates: &CandidateSet) -> SupportedSet {
        let device = settings.recording_device_name.clone();
        let supported = self.probe_device(&device, StreamDirection::Capture, candidates);
        settings.apply_supported(&supported);

        let configured = settings.recording_capability();
        if !supported.truncated && !supported.supports(&configured) {
            log::warn!(
                "{} does not accept the configured {} Hz / {} bit / {} ch",
                device,
                configured.rate,
                configured.bits,
                configured.channels
            );
        }
        supported
    }

    /// Try every distinct candidate triple against `device`.
    ///
    /// A failing trial only excludes that triple; it is logged, not returned.
    pub fn probe_device(
        &mut self,
        device: &str,
        direction: StreamDirection,
        candidates: &CandidateSet,
    ) -> SupportedSet {
        let mut seen = HashSet::new();
        let mut supported = SupportedSet::default();
        let mut tried = 0;

        for capability in candidates.combinations().filter(|c| seen.insert(*c)) {
            if tried == MAX_TRIALS {
                log::warn!(
                    "{}: more than {} distinct candidate combinations, result is partial",
                    device,
                    MAX_TRIALS
                );
                supported.truncated = true;
                break;
            }
            tried += 1;
            match self.opener.try_open(device, direction, &capability) {
                Ok(()) => supported.record(capability),
                Err(e) => {
                    let err = MixerError::ProbeTrialFailed {
                        rate: capability.rate,
                        bits: capability.bits,
                        channels: capability.channels,
                        code: e.code,
                    };
                    log::debug!("{}: {}", device, err);
                }
            }
        }

        log::info!(
            "{} supports {} of {} probed combination(s)",
            device,
            supported.combinations.len(),
            tried
        );
        supported
    }

    pub fn into_inner(self) -> T {
        self.opener
    }
}
