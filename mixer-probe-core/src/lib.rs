//! # mixer-probe-core
//!
//! Platform-agnostic mixer probing core library.
//!
//! Discovers sound cards and their mixer controls, probes which stream
//! configurations a device really accepts, and sweeps mixer controls across
//! their safe range while sampling an audio level at every step. Native
//! backends (Linux ALSA) implement the traits in `traits/` and plug into
//! the generic components here.
//!
//! ## Architecture
//!
//! ```text
//! mixer-probe-core (this crate)
//! ├── traits/       ← CardSource, MixerBackend, NativeMixer, TrialOpener, LevelSampler
//! ├── models/       ← MixerError, CardDescriptor, DeviceHint, ControlInfo, SweepSpec, DeviceSettings, etc.
//! ├── discovery/    ← DeviceEnumerator
//! ├── session/      ← MixerSession (native handle lifetime), MixerProbe (facade)
//! ├── catalog/      ← control discovery and access, label lookup, MixerSnapshot
//! ├── probing/      ← CapabilityProber
//! ├── sweep/        ← SweepEngine, SweepSteps, CancelToken
//! ├── processing/   ← RMS / peak / dBFS level math
//! └── storage/      ← JSON-lines ResultsWriter, snapshot files
//! ```

pub mod catalog;
pub mod discovery;
pub mod models;
pub mod probing;
pub mod processing;
pub mod session;
pub mod storage;
pub mod sweep;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use catalog::control_catalog::{
    find_control, get_channel_label, get_channel_value, get_element_value, list_controls, set_channel_label,
    set_channel_value, set_element_value,
};
pub use catalog::labels::label_to_ordinal;
pub use catalog::snapshot::{MixerSnapshot, SnapshotEntry};
pub use discovery::enumerator::DeviceEnumerator;
pub use models::capability::{CandidateSet, DeviceCapability, SupportedSet};
pub use models::card::CardDescriptor;
pub use models::config::{DeviceSettings, SweepConfiguration, SweepSpec};
pub use models::control::{ChannelId, ControlChannelInfo, ControlInfo, ControlKind, ElementCaps, ElementId, StreamDirection};
pub use models::error::{MixerError, MixerStage, NativeError};
pub use models::hint::DeviceHint;
pub use models::measurement::MeasurementSample;
pub use models::state::SweepState;
pub use models::sweep_result::{SweepOutcome, SweepReport};
pub use probing::capability_prober::CapabilityProber;
pub use session::mixer_probe::MixerProbe;
pub use session::mixer_session::MixerSession;
pub use storage::results_writer::ResultsWriter;
pub use sweep::cancel::CancelToken;
pub use sweep::engine::SweepEngine;
pub use sweep::steps::SweepSteps;
pub use traits::card_source::CardSource;
pub use traits::level_sampler::LevelSampler;
pub use traits::native_mixer::{MixerBackend, NativeMixer};
pub use traits::trial_opener::TrialOpener;
