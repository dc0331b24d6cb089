use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use regex::Regex;

use crate::catalog::control_catalog::{get_element_value, list_controls, set_element_value};
use crate::models::config::{SweepConfiguration, SweepSpec};
use crate::models::control::{ControlInfo, ElementId};
use crate::models::error::MixerError;
use crate::models::measurement::MeasurementSample;
use crate::models::state::SweepState;
use crate::models::sweep_result::{SweepOutcome, SweepReport};
use crate::session::mixer_session::MixerSession;
use crate::storage::results_writer::ResultsWriter;
use crate::traits::level_sampler::LevelSampler;
use crate::traits::native_mixer::NativeMixer;

use super::cancel::CancelToken;
use super::steps::SweepSteps;

/// Drives mixer controls across their safe range, sampling a level after
/// every write.
///
/// Per matched control:
/// ```text
/// [hw range] ∩ [clamp] → min, min+step, .., max
///     each value: write → settle → sample → record
/// then restore the pre-sweep values (best-effort)
/// ```
///
/// Single-threaded: every write and the sample that follows it happen in
/// order on the calling thread.
pub struct SweepEngine {
    restore_original_values: bool,
    settle_time: Duration,
    channel: Option<String>,
    cancel: CancelToken,
    writer: Option<Arc<ResultsWriter>>,
}

impl SweepEngine {
    pub fn new() -> Self {
        Self {
            restore_original_values: true,
            settle_time: Duration::ZERO,
            channel: None,
            cancel: CancelToken::new(),
            writer: None,
        }
    }

    /// Engine configured from `config`, with a results writer when a
    /// results path is set.
    pub fn from_config(config: &SweepConfiguration) -> Result<Self, MixerError> {
        let writer = match &config.results_path {
            Some(path) => Some(Arc::new(ResultsWriter::new(path)?)),
            None => None,
        };
        Ok(Self {
            restore_original_values: config.restore_original_values,
            settle_time: config.settle_time(),
            channel: config.channel.clone(),
            cancel: CancelToken::new(),
            writer,
        })
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_writer(mut self, writer: Arc<ResultsWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    pub fn with_restore(mut self, restore: bool) -> Self {
        self.restore_original_values = restore;
        self
    }

    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Sweep every control matched by each spec, in spec order.
    ///
    /// Every spec is validated before the first write, so a bad step or
    /// regex fails the run without touching hardware. Per-control write
    /// failures are recorded in the report and do not stop other controls.
    pub fn run<H, L>(
        &self,
        session: &mut MixerSession<H>,
        specs: &[SweepSpec],
        sampler: &mut L,
    ) -> Result<SweepReport, MixerError>
    where
        H: NativeMixer,
        L: LevelSampler + ?Sized,
    {
        let compiled = specs
            .iter()
            .map(|spec| -> Result<(&SweepSpec, Regex), MixerError> {
                spec.validate()?;
                Ok((spec, spec.compile()?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let controls = list_controls(&*session);
        let mut outcomes = Vec::new();
        let mut cancelled = false;

        log::info!("Sweep run {} on {}: {} spec(s)", run_id, session.device(), specs.len());

        'specs: for (spec, regex) in &compiled {
            let matched: Vec<&ControlInfo> = controls
                .iter()
                .filter(|c| regex.is_match(&c.control_name))
                .collect();
            if matched.is_empty() {
                log::info!("No control matches {:?}", spec.control_name_regex);
                continue;
            }

            for control in matched {
                if self.cancel.is_cancelled() {
                    cancelled = true;
                    break 'specs;
                }
                let outcome = self.sweep_control(session, spec, control, sampler, &run_id);
                cancelled |= outcome.state == SweepState::Cancelled;
                outcomes.push(outcome);
                if cancelled {
                    break 'specs;
                }
            }
        }

        let report = SweepReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
            cancelled,
        };
        log::info!(
            "Sweep run {} finished in {:.1}s: {} of {} control(s) completed{}",
            report.run_id,
            report.duration_secs(),
            report.completed_count(),
            report.outcomes.len(),
            if report.cancelled { " (cancelled)" } else { "" }
        );
        Ok(report)
    }

    fn sweep_control<H, L>(
        &self,
        session: &mut MixerSession<H>,
        spec: &SweepSpec,
        control: &ControlInfo,
        sampler: &mut L,
        run_id: &str,
    ) -> SweepOutcome
    where
        H: NativeMixer,
        L: LevelSampler + ?Sized,
    {
        let name = control.control_name.as_str();
        let element = control.element_id();
        let mut outcome = SweepOutcome::new(name, control.index);
        let channel = self.channel.as_deref();

        // Hardware range over the channels this sweep writes.
        let hw_range = match channel {
            Some(ch) => control.channel(ch).map(|c| (c.min, c.max)),
            None => control.common_range(),
        };
        let Some((hw_min, hw_max)) = hw_range else {
            match channel {
                Some(ch) => log::info!("Skipping {}: no channel {}", name, ch),
                None => log::info!("Skipping {}: channels share no common range", name),
            }
            // No hardware range to intersect with; the envelope stands alone.
            outcome.advance(SweepState::Clamped {
                min: spec.clamp_min,
                max: spec.clamp_max,
            });
            outcome.advance(SweepState::Skipped);
            return outcome;
        };

        let effective = spec.effective_range(hw_min, hw_max);
        let (min, max) = effective.unwrap_or((spec.clamp_min.max(hw_min), spec.clamp_max.min(hw_max)));
        outcome.effective_range = effective;
        outcome.advance(SweepState::Clamped { min, max });

        if effective.is_none() {
            log::info!(
                "Skipping {}: clamp [{}, {}] does not overlap hardware [{}, {}]",
                name,
                spec.clamp_min,
                spec.clamp_max,
                hw_min,
                hw_max
            );
            outcome.advance(SweepState::Skipped);
            return outcome;
        }

        let steps = match SweepSteps::new(min, max, spec.step) {
            Ok(steps) => steps,
            Err(e) => {
                outcome.error = Some(e);
                outcome.advance(SweepState::Skipped);
                return outcome;
            }
        };

        let originals = self.original_values(&*session, control);
        log::info!("Sweeping {} over [{}, {}] step {}", name, min, max, spec.step);

        for value in steps {
            if self.cancel.is_cancelled() {
                log::info!("Sweep of {} cancelled before {}", name, value);
                outcome.advance(SweepState::Cancelled);
                break;
            }
            outcome.advance(SweepState::Stepping { value });

            if let Err(e) = set_element_value(session, &element, channel, value) {
                log::warn!("Sweep of {} stopped at {}: {}", name, value, e);
                outcome.error = Some(e);
                outcome.advance(SweepState::Failed);
                break;
            }

            if !self.settle_time.is_zero() {
                thread::sleep(self.settle_time);
            }

            let level = sampler.sample().unwrap_or_else(|e| {
                log::warn!("{} = {}: {}", name, value, e);
                f64::NAN
            });
            log::debug!("{} = {} -> {:.2}", name, value, level);

            let sample = MeasurementSample::new(run_id, name, channel, value, level).with_index(control.index);
            if let Some(writer) = &self.writer {
                if let Err(e) = writer.append(&sample) {
                    log::warn!("{}", e);
                }
            }
            outcome.samples.push(sample);
        }

        if matches!(outcome.state, SweepState::Stepping { .. }) {
            outcome.advance(SweepState::Completed);
        }

        let touched = !outcome.samples.is_empty() || outcome.error.is_some();
        if self.restore_original_values && touched {
            outcome.restore_error = restore(session, &element, &originals);
        }
        outcome
    }

    /// Pre-sweep value of every channel the sweep will touch, read live and
    /// falling back to the discovered value.
    fn original_values<H: NativeMixer>(&self, session: &MixerSession<H>, control: &ControlInfo) -> Vec<(String, i64)> {
        control
            .channels
            .iter()
            .filter(|c| match self.channel.as_deref() {
                Some(ch) => control.channel(ch).is_some_and(|target| target.channel == c.channel),
                None => true,
            })
            .map(|c| {
                let value = get_element_value(session, &control.element_id(), Some(c.name.as_str())).unwrap_or(c.raw);
                (c.name.clone(), value)
            })
            .collect()
    }
}

impl Default for SweepEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Write pre-sweep values back; returns the first failure.
fn restore<H: NativeMixer>(
    session: &mut MixerSession<H>,
    element: &ElementId,
    originals: &[(String, i64)],
) -> Option<MixerError> {
    let mut first_error = None;
    for (channel, value) in originals {
        if let Err(e) = set_element_value(session, element, Some(channel.as_str()), *value) {
            log::warn!("Restoring {} {} to {} failed: {}", element.name, channel, value, e);
            first_error.get_or_insert(e);
        }
    }
    first_error
}
