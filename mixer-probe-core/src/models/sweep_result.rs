use chrono::{DateTime, Utc};

use super::error::MixerError;
use super::measurement::MeasurementSample;
use super::state::SweepState;

/// What happened to one matched control during a sweep run.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    pub control_name: String,
    /// Element index; tells same-name controls apart.
    pub index: u32,
    pub state: SweepState,
    /// Intersection of the safety envelope and the hardware range; `None`
    /// when they did not overlap.
    pub effective_range: Option<(i64, i64)>,
    pub samples: Vec<MeasurementSample>,
    /// Write failure that ended stepping early.
    pub error: Option<MixerError>,
    /// First failure while writing the pre-sweep values back. Reported only.
    pub restore_error: Option<MixerError>,
}

impl SweepOutcome {
    pub fn new(control_name: &str, index: u32) -> Self {
        Self {
            control_name: control_name.to_string(),
            index,
            state: SweepState::NotStarted,
            effective_range: None,
            samples: Vec::new(),
            error: None,
            restore_error: None,
        }
    }

    pub(crate) fn advance(&mut self, next: SweepState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal sweep transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    pub fn applied_values(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.applied_value).collect()
    }
}

/// Result of one `SweepEngine::run`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SweepOutcome>,
    /// Set when cancellation stopped the run before every control was visited.
    pub cancelled: bool,
}

impl SweepReport {
    /// First outcome for `control_name`.
    pub fn outcome(&self, control_name: &str) -> Option<&SweepOutcome> {
        self.outcomes.iter().find(|o| o.control_name == control_name)
    }

    pub fn outcome_at(&self, control_name: &str, index: u32) -> Option<&SweepOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.control_name == control_name && o.index == index)
    }

    pub fn samples(&self) -> impl Iterator<Item = &MeasurementSample> {
        self.outcomes.iter().flat_map(|o| o.samples.iter())
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.state.is_completed()).count()
    }

    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
